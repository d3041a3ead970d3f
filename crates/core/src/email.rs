//! Destination-address validation for login requests and user registration.
//!
//! A destination must be syntactically an email address (checked with
//! `validator`) and no longer than [`MAX_EMAIL_LENGTH`] characters, counted
//! like `#[validate(length)]` and the `char_length` check on `users.email`.
//! Validation happens before any identity lookup or token operation.

use validator::ValidateEmail;

use crate::error::CoreError;

/// Maximum accepted length of an email address (RFC 5321 forward-path limit).
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Validate that `destination` is a well-formed email address.
///
/// Returns `Ok(())` when acceptable, or [`CoreError::Validation`] with a
/// human-readable explanation.
pub fn validate_destination(destination: &str) -> Result<(), CoreError> {
    if destination.chars().count() > MAX_EMAIL_LENGTH {
        return Err(CoreError::Validation(format!(
            "destination must be at most {MAX_EMAIL_LENGTH} characters long"
        )));
    }
    if !destination.validate_email() {
        return Err(CoreError::Validation(
            "destination must be a valid email address".into(),
        ));
    }
    Ok(())
}
