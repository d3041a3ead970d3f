//! Pluggable login strategies.
//!
//! A strategy owns both halves of a passwordless handshake: pushing a
//! credential to the user ([`LoginStrategy::send`]) and turning the inbound
//! callback back into a user ([`LoginStrategy::verify`]). Magic links over a
//! [`DeliveryChannel`] are the only variant today; SMS or push would be
//! further implementations of the same trait.

use std::sync::Arc;

use archivist_db::models::user::User;
use archivist_db::store::UserStore;
use archivist_delivery::DeliveryChannel;
use async_trait::async_trait;
use serde::Deserialize;

use super::dispatcher::{DispatchError, MagicLinkDispatcher};
use super::link::{LinkTokenCodec, MagicLinkConfig};
use super::service::{resolve_identity, AuthError};

/// Query parameters of `GET /auth/login/callback`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackPayload {
    pub token: Option<String>,
}

#[async_trait]
pub trait LoginStrategy: Send + Sync {
    /// Short identifier used in log fields.
    fn name(&self) -> &'static str;

    /// Issue a credential for an already-validated `destination` and deliver it.
    async fn send(&self, destination: &str) -> Result<(), AuthError>;

    /// Check the callback payload and resolve the user it vouches for.
    async fn verify(&self, payload: &CallbackPayload) -> Result<User, AuthError>;
}

/// Email magic-link strategy.
pub struct MagicLinkStrategy {
    users: Arc<dyn UserStore>,
    links: LinkTokenCodec,
    dispatcher: MagicLinkDispatcher,
}

impl MagicLinkStrategy {
    pub fn new(
        users: Arc<dyn UserStore>,
        config: &MagicLinkConfig,
        channel: Arc<dyn DeliveryChannel>,
    ) -> Self {
        let links = LinkTokenCodec::new(config);
        let dispatcher = MagicLinkDispatcher::new(links.clone(), &config.callback_url, channel);
        Self {
            users,
            links,
            dispatcher,
        }
    }
}

#[async_trait]
impl LoginStrategy for MagicLinkStrategy {
    fn name(&self) -> &'static str {
        "magic-link"
    }

    /// Delivery failures are logged and swallowed: the caller sees the same
    /// response whether or not the email went out.
    async fn send(&self, destination: &str) -> Result<(), AuthError> {
        match self.dispatcher.send(destination).await {
            Ok(()) => Ok(()),
            Err(DispatchError::Delivery(err)) => {
                tracing::warn!(to = %destination, error = %err, "Magic link delivery failed");
                Ok(())
            }
            Err(DispatchError::Token(err)) => Err(AuthError::Issue(err.to_string())),
        }
    }

    async fn verify(&self, payload: &CallbackPayload) -> Result<User, AuthError> {
        let token = payload
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::Unauthorized)?;

        let destination = self.links.verify(token).map_err(|reason| {
            tracing::debug!(%reason, "Link token rejected");
            AuthError::Unauthorized
        })?;

        resolve_identity(self.users.as_ref(), &destination).await
    }
}
