//! Magic-link construction and hand-off to a delivery channel.

use std::sync::Arc;

use archivist_delivery::{DeliveryChannel, DeliveryError, LinkMessage};

use super::link::LinkTokenCodec;
use super::token::now_ts;

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("failed to sign link token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

/// Builds `callback_url?token=<link token>` and delivers it out of band.
#[derive(Clone)]
pub struct MagicLinkDispatcher {
    links: LinkTokenCodec,
    callback_url: String,
    channel: Arc<dyn DeliveryChannel>,
}

impl MagicLinkDispatcher {
    pub fn new(
        links: LinkTokenCodec,
        callback_url: impl Into<String>,
        channel: Arc<dyn DeliveryChannel>,
    ) -> Self {
        Self {
            links,
            callback_url: callback_url.into(),
            channel,
        }
    }

    /// Build the callback URL for `destination` as of `now`.
    pub fn link_for(
        &self,
        destination: &str,
        now: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let token = self.links.issue_at(destination, now)?;
        let separator = if self.callback_url.contains('?') { '&' } else { '?' };
        // JWT segments are base64url and '.', so the token needs no escaping.
        Ok(format!("{}{separator}token={token}", self.callback_url))
    }

    /// Sign a fresh link for `destination` and make one delivery attempt.
    pub async fn send(&self, destination: &str) -> Result<(), DispatchError> {
        let message = LinkMessage {
            destination: destination.to_string(),
            link: self.link_for(destination, now_ts())?,
            expires_in: self
                .links
                .expires_in()
                .to_std()
                .unwrap_or_default(),
        };

        self.channel.deliver(&message).await?;
        tracing::info!(
            to = %destination,
            channel = self.channel.name(),
            "Magic link dispatched"
        );
        Ok(())
    }
}
