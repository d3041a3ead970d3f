//! Bearer-token authentication extractor for Axum handlers.

use archivist_db::models::user::User;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::auth::AuthError;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user resolved from a session token in the `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication. The request is rejected with the same 401 body whether
/// the header is missing, uses another scheme, carries a token that fails
/// verification, or names a user that no longer exists.
///
/// ```ignore
/// async fn my_handler(auth_user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = auth_user.user.id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user record as of this request.
    pub user: User,
}

/// Pull the credential out of `Bearer <token>`. The scheme is
/// case-insensitive (RFC 7235).
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| {
                tracing::debug!("Missing or non-bearer Authorization header");
                AuthError::Unauthorized
            })?;

        let user = state.auth.authorize(token).await?;
        Ok(AuthUser { user })
    }
}
