//! Parsing of token expiration strings such as `"5m"` or `"1h"`.
//!
//! Any duration `humantime` understands is accepted (`30s`, `5m`, `1h`,
//! `7d`, `1h 30m`, ...). A bare integer is read as seconds.

use chrono::Duration;

use crate::error::CoreError;

/// Parse an expiration string into a [`Duration`].
///
/// Zero, negative, out-of-range, and unrecognised values are rejected.
pub fn parse_expiry(raw: &str) -> Result<Duration, CoreError> {
    let raw = raw.trim();
    let invalid =
        |reason: String| CoreError::Validation(format!("invalid expiration '{raw}': {reason}"));

    let parsed = if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        humantime::parse_duration(&format!("{raw}s"))
    } else {
        humantime::parse_duration(raw)
    }
    .map_err(|e| invalid(e.to_string()))?;

    if parsed.is_zero() {
        return Err(invalid("must be greater than zero".into()));
    }
    Duration::from_std(parsed).map_err(|e| invalid(e.to_string()))
}
