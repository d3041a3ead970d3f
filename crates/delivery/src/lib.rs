//! Out-of-band delivery of magic links.
//!
//! - [`DeliveryChannel`] -- the transport seam the dispatcher hands a
//!   [`LinkMessage`] to. One call is one delivery attempt; channels never retry.
//! - [`EmailDelivery`] -- SMTP delivery via `lettre`.
//! - [`LogChannel`] -- writes the link to the log; used when SMTP is not
//!   configured (local development).

pub mod channel;
pub mod email;

pub use channel::{DeliveryChannel, DeliveryError, LinkMessage, LogChannel};
pub use email::{EmailConfig, EmailDelivery};
