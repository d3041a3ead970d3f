//! Passwordless authentication.
//!
//! - [`link`] -- short-lived magic-link token codec.
//! - [`session`] -- bearer access-token codec.
//! - [`dispatcher`] -- builds the callback URL and hands it to a delivery channel.
//! - [`strategy`] -- the pluggable send/verify pair ([`strategy::MagicLinkStrategy`]).
//! - [`service`] -- [`service::AuthService`], the login orchestrator.

pub mod dispatcher;
pub mod link;
pub mod service;
pub mod session;
pub mod strategy;
pub mod token;

#[cfg(test)]
pub(crate) mod test_support;

pub use service::{AuthError, AuthService, TokenResponse};
pub use token::TokenError;
