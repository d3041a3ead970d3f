//! Magic-link token issuance and verification.
//!
//! A link token proves control of a destination address for a short window.
//! It carries its own audience so it can only ever complete the login
//! callback; it is never accepted as a session credential. Nothing is stored,
//! so a link remains usable until it expires.

use chrono::Duration;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use super::token::{
    check_expiry, expiry_from_env, leeway_from_env, now_ts, secret_from_env, validation_for,
    TokenError,
};

/// Audience claim that marks a JWT as a magic-link credential.
pub const LINK_AUDIENCE: &str = "archivist:magic-link";

/// Default link lifetime.
const DEFAULT_EXPIRATION: &str = "5m";

/// Default callback URL, matching the local dev server.
const DEFAULT_CALLBACK_URL: &str = "http://localhost:3000/auth/login/callback";

/// Claims embedded in every link token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LinkClaims {
    /// The address the link was sent to.
    pub destination: String,
    /// Always [`LINK_AUDIENCE`].
    pub aud: String,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// Configuration for magic links.
#[derive(Debug, Clone)]
pub struct MagicLinkConfig {
    /// HMAC-SHA256 secret, independent from the session secret.
    pub secret: String,
    /// Link lifetime (default: 5 minutes).
    pub expires_in: Duration,
    /// Base URL of the login callback; the token is appended as `token=`.
    pub callback_url: String,
    /// Clock-skew tolerance in seconds applied to `exp` (default: 0).
    pub leeway_secs: i64,
}

impl MagicLinkConfig {
    /// Load magic-link configuration from environment variables.
    ///
    /// | Env Var                   | Required | Default                                     |
    /// |---------------------------|----------|---------------------------------------------|
    /// | `MAGIC_LINK_SECRET`       | **yes**  | --                                          |
    /// | `MAGIC_LINK_EXPIRATION`   | no       | `5m`                                        |
    /// | `MAGIC_LINK_CALLBACK_URL` | no       | `http://localhost:3000/auth/login/callback` |
    /// | `TOKEN_LEEWAY_SECS`       | no       | `0`                                         |
    ///
    /// # Panics
    ///
    /// Panics if `MAGIC_LINK_SECRET` is not set or is empty, or if a value is
    /// invalid.
    pub fn from_env() -> Self {
        Self {
            secret: secret_from_env("MAGIC_LINK_SECRET"),
            expires_in: expiry_from_env("MAGIC_LINK_EXPIRATION", DEFAULT_EXPIRATION),
            callback_url: std::env::var("MAGIC_LINK_CALLBACK_URL")
                .unwrap_or_else(|_| DEFAULT_CALLBACK_URL.into()),
            leeway_secs: leeway_from_env(),
        }
    }
}

/// Signs and verifies link tokens.
#[derive(Clone)]
pub struct LinkTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in: Duration,
    leeway_secs: i64,
}

impl LinkTokenCodec {
    pub fn new(config: &MagicLinkConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            expires_in: config.expires_in,
            leeway_secs: config.leeway_secs,
        }
    }

    /// Configured link lifetime.
    pub fn expires_in(&self) -> Duration {
        self.expires_in
    }

    /// Issue a link token for `destination`, valid from now.
    pub fn issue(&self, destination: &str) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue_at(destination, now_ts())
    }

    /// Issue a link token as if the current time were `now`.
    pub fn issue_at(
        &self,
        destination: &str,
        now: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = LinkClaims {
            destination: destination.to_string(),
            aud: LINK_AUDIENCE.to_string(),
            iat: now,
            exp: now + self.expires_in.num_seconds(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Verify a link token against the current time, returning its destination.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        self.verify_at(token, now_ts())
    }

    pub fn verify_at(&self, token: &str, now: i64) -> Result<String, TokenError> {
        let token_data =
            decode::<LinkClaims>(token, &self.decoding_key, &validation_for(LINK_AUDIENCE))?;
        check_expiry(token_data.claims.exp, now, self.leeway_secs)?;
        Ok(token_data.claims.destination)
    }
}
