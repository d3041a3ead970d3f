//! Session (access) token issuance and verification.
//!
//! Access tokens are HS256-signed JWTs containing a [`SessionClaims`] payload.
//! They are never stored server-side: validity is decided by signature and
//! expiry alone, and the request gate re-resolves the identity on every use.

use archivist_core::types::DbId;
use chrono::Duration;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use super::token::{
    check_expiry, expiry_from_env, leeway_from_env, now_ts, secret_from_env, validation_for,
    TokenError,
};

/// Audience claim that marks a JWT as a session credential.
pub const SESSION_AUDIENCE: &str = "archivist:session";

/// Default session lifetime.
const DEFAULT_EXPIRATION: &str = "1h";

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// The user's email at issuance.
    pub email: String,
    /// Always [`SESSION_AUDIENCE`].
    pub aud: String,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// Configuration for session token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime (default: 1 hour).
    pub expires_in: Duration,
    /// Clock-skew tolerance in seconds applied to `exp` (default: 0).
    pub leeway_secs: i64,
}

impl JwtConfig {
    /// Load session token configuration from environment variables.
    ///
    /// | Env Var             | Required | Default |
    /// |---------------------|----------|---------|
    /// | `JWT_SECRET`        | **yes**  | --      |
    /// | `JWT_EXPIRATION`    | no       | `1h`    |
    /// | `TOKEN_LEEWAY_SECS` | no       | `0`     |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty, or if a value is invalid.
    pub fn from_env() -> Self {
        Self {
            secret: secret_from_env("JWT_SECRET"),
            expires_in: expiry_from_env("JWT_EXPIRATION", DEFAULT_EXPIRATION),
            leeway_secs: leeway_from_env(),
        }
    }
}

/// Signs and verifies session tokens with a fixed key and lifetime.
#[derive(Clone)]
pub struct SessionTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in: Duration,
    leeway_secs: i64,
}

impl SessionTokenCodec {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            expires_in: config.expires_in,
            leeway_secs: config.leeway_secs,
        }
    }

    /// Issue an access token for `user_id` / `email`, valid from now.
    pub fn issue(&self, user_id: DbId, email: &str) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue_at(user_id, email, now_ts())
    }

    /// Issue an access token as if the current time were `now`.
    ///
    /// Deterministic: the same inputs always yield the same token.
    pub fn issue_at(
        &self,
        user_id: DbId,
        email: &str,
        now: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = SessionClaims {
            sub: user_id,
            email: email.to_string(),
            aud: SESSION_AUDIENCE.to_string(),
            iat: now,
            exp: now + self.expires_in.num_seconds(),
        };

        encode(
            &Header::default(), // HS256
            &claims,
            &self.encoding_key,
        )
    }

    /// Verify an access token against the current time.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.verify_at(token, now_ts())
    }

    /// Verify signature, audience and expiry, returning the embedded claims.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<SessionClaims, TokenError> {
        let token_data = decode::<SessionClaims>(
            token,
            &self.decoding_key,
            &validation_for(SESSION_AUDIENCE),
        )?;
        check_expiry(token_data.claims.exp, now, self.leeway_secs)?;
        Ok(token_data.claims)
    }
}
