//! The login orchestrator.
//!
//! [`AuthService`] drives both halves of the passwordless flow and the
//! per-request bearer check:
//!
//! ```text
//! request_login(dest) --validate--> lookup --strategy.send--> link delivered
//! complete_login(payload) --strategy.verify--> user --generate_tokens--> access token
//! authorize(bearer) --session verify--> claims --resolve_identity--> user
//! ```
//!
//! Every identity failure on the callback and bearer paths collapses into
//! [`AuthError::Unauthorized`] so responses never reveal which addresses are
//! registered.

use std::sync::Arc;

use archivist_core::email::validate_destination;
use archivist_db::models::user::User;
use archivist_db::store::{StoreError, UserStore};
use serde::Serialize;

use super::session::SessionTokenCodec;
use super::strategy::{CallbackPayload, LoginStrategy};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The login destination is not a usable email address.
    #[error("{0}")]
    InvalidDestination(String),

    /// No user is registered for the login destination.
    #[error("No user is registered for this destination")]
    UnknownDestination,

    /// Any failed identity or token check.
    #[error("Please try logging in again")]
    Unauthorized,

    /// Signing a token failed.
    #[error("Token issuance failed: {0}")]
    Issue(String),
}

/// Body returned by a completed login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Look up `email` and fold every store failure into [`AuthError::Unauthorized`].
pub async fn resolve_identity(users: &dyn UserStore, email: &str) -> Result<User, AuthError> {
    users.find_by_email(email).await.map_err(|err| {
        match &err {
            StoreError::NotFound { .. } => tracing::debug!("Identity lookup missed"),
            other => tracing::error!(error = %other, "Identity lookup failed"),
        }
        AuthError::Unauthorized
    })
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    sessions: SessionTokenCodec,
    strategy: Arc<dyn LoginStrategy>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: SessionTokenCodec,
        strategy: Arc<dyn LoginStrategy>,
    ) -> Self {
        Self {
            users,
            sessions,
            strategy,
        }
    }

    /// Session codec used for issuance and bearer verification.
    pub fn sessions(&self) -> &SessionTokenCodec {
        &self.sessions
    }

    /// Resolve the user registered under `email`, or fail with `Unauthorized`.
    pub async fn validate_user(&self, email: &str) -> Result<User, AuthError> {
        resolve_identity(self.users.as_ref(), email).await
    }

    /// First phase: check the destination and have the strategy deliver a link.
    ///
    /// Unlike the callback path, an unregistered destination is reported as
    /// [`AuthError::UnknownDestination`].
    pub async fn request_login(&self, destination: &str) -> Result<(), AuthError> {
        validate_destination(destination)
            .map_err(|e| AuthError::InvalidDestination(e.to_string()))?;

        match self.users.find_by_email(destination).await {
            Ok(_) => {}
            Err(StoreError::NotFound { .. }) => return Err(AuthError::UnknownDestination),
            Err(err) => {
                tracing::error!(error = %err, "Identity lookup failed");
                return Err(AuthError::Unauthorized);
            }
        }

        self.strategy.send(destination).await
    }

    /// Second phase: verify the callback and issue a session token.
    pub async fn complete_login(
        &self,
        payload: &CallbackPayload,
    ) -> Result<TokenResponse, AuthError> {
        let user = self.strategy.verify(payload).await?;
        let tokens = self.generate_tokens(&user)?;
        tracing::info!(user_id = user.id, strategy = self.strategy.name(), "Login completed");
        Ok(tokens)
    }

    /// Sign an access token for an already-validated user.
    pub fn generate_tokens(&self, user: &User) -> Result<TokenResponse, AuthError> {
        let access_token = self
            .sessions
            .issue(user.id, &user.email)
            .map_err(|e| AuthError::Issue(e.to_string()))?;
        Ok(TokenResponse { access_token })
    }

    /// Verify a bearer token and resolve it to a live user.
    ///
    /// The user is looked up again on every call, so deleting a user revokes
    /// their outstanding tokens. The stored id must also match `sub`, so an
    /// address re-registered after deletion does not inherit old sessions.
    pub async fn authorize(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.sessions.verify(token).map_err(|reason| {
            tracing::debug!(%reason, "Session token rejected");
            AuthError::Unauthorized
        })?;

        let user = resolve_identity(self.users.as_ref(), &claims.email).await?;
        if user.id != claims.sub {
            tracing::debug!(user_id = user.id, sub = claims.sub, "Session subject mismatch");
            return Err(AuthError::Unauthorized);
        }
        Ok(user)
    }
}
