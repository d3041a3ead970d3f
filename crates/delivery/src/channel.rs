use std::time::Duration;

use async_trait::async_trait;

/// Error type for delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    /// Failure reported by a non-email channel.
    #[error("Delivery channel error: {0}")]
    Channel(String),
}

/// A magic link ready to be handed to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMessage {
    /// Address the link is delivered to.
    pub destination: String,
    /// Full callback URL, token included.
    pub link: String,
    /// How long the link stays valid after issuance.
    pub expires_in: Duration,
}

/// A transport capable of delivering a [`LinkMessage`].
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Short channel identifier used in log fields.
    fn name(&self) -> &'static str;

    /// Make exactly one delivery attempt.
    async fn deliver(&self, message: &LinkMessage) -> Result<(), DeliveryError>;
}

/// Delivery channel that writes the link to the application log.
///
/// Only meant for environments without SMTP; anyone with log access can sign
/// in as any user.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogChannel;

#[async_trait]
impl DeliveryChannel for LogChannel {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn deliver(&self, message: &LinkMessage) -> Result<(), DeliveryError> {
        tracing::info!(
            to = %message.destination,
            link = %message.link,
            expires_in_secs = message.expires_in.as_secs(),
            "Magic link (SMTP not configured, logging instead of sending)"
        );
        Ok(())
    }
}
