//! Pieces shared by the link-token and session-token codecs.
//!
//! Both codecs sign HS256 JWTs but check expiry themselves against an explicit
//! `now`, so tests can pin the clock and the skew tolerance is ours to choose
//! (`jsonwebtoken` defaults to a 60-second leeway).

use archivist_core::expiry::parse_expiry;
use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, Validation};

/// Default clock-skew tolerance in seconds.
const DEFAULT_LEEWAY_SECS: i64 = 0;

/// Why a token failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    SignatureInvalid,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
            // Wrong audience, missing claims, bad base64/JSON, wrong algorithm.
            _ => TokenError::Malformed,
        }
    }
}

/// Read an expiration string (e.g. `"5m"`) from `var`, falling back to `default`.
///
/// # Panics
///
/// Panics if the value cannot be parsed.
pub(crate) fn expiry_from_env(var: &str, default: &str) -> Duration {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    parse_expiry(&raw).unwrap_or_else(|e| panic!("{var} is invalid: {e}"))
}

/// Read the clock-skew tolerance shared by both codecs (`TOKEN_LEEWAY_SECS`).
///
/// # Panics
///
/// Panics if the value is not a non-negative integer.
pub(crate) fn leeway_from_env() -> i64 {
    let leeway: i64 = std::env::var("TOKEN_LEEWAY_SECS")
        .unwrap_or_else(|_| DEFAULT_LEEWAY_SECS.to_string())
        .parse()
        .expect("TOKEN_LEEWAY_SECS must be a valid i64");
    assert!(leeway >= 0, "TOKEN_LEEWAY_SECS must not be negative");
    leeway
}

/// Read a required, non-empty signing secret from `var`.
///
/// # Panics
///
/// Panics if the variable is unset or empty.
pub(crate) fn secret_from_env(var: &str) -> String {
    let secret = std::env::var(var).unwrap_or_else(|_| panic!("{var} must be set in the environment"));
    assert!(!secret.is_empty(), "{var} must not be empty");
    secret
}

/// Current time as whole seconds since the Unix epoch.
pub fn now_ts() -> i64 {
    chrono::Utc::now().timestamp()
}

/// HS256 validation pinned to `audience`, with the library's own expiry check
/// disabled in favour of [`check_expiry`].
pub(crate) fn validation_for(audience: &str) -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.set_audience(&[audience]);
    validation.set_required_spec_claims(&["exp", "aud"]);
    validation
}

/// Reject `exp` once `now` has moved past it by more than `leeway_secs`.
pub(crate) fn check_expiry(exp: i64, now: i64, leeway_secs: i64) -> Result<(), TokenError> {
    if exp < now - leeway_secs {
        return Err(TokenError::Expired);
    }
    Ok(())
}
