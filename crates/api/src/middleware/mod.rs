//! Request extractors.
//!
//! - [`auth::AuthUser`] -- resolves the calling user from a Bearer session token.

pub mod auth;
