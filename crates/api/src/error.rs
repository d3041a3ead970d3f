use archivist_core::error::CoreError;
use archivist_db::store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::auth::AuthError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`], [`StoreError`] and [`AuthError`] and adds
/// `BadRequest` for unparseable bodies. Implements [`IntoResponse`] to produce
/// consistent `{"error", "code"}` JSON responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request-body validation failure from `archivist_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An identity-store error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A login or bearer-token failure.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A body that could not be parsed at all.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Body text for every 500 response.
const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Store(err) => classify_store_error(err),
            AppError::Auth(err) => classify_auth_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a store error into an HTTP status, error code, and message.
///
/// - `NotFound` maps to 404.
/// - `Conflict` (duplicate email) maps to 409.
/// - Database failures map to 500 with a sanitized message.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::NotFound { entity, key } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} {key} not found"),
        ),
        StoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        StoreError::Database(db_err) => {
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE.to_string(),
            )
        }
    }
}

/// Classify an auth error. Every identity or token failure shares one
/// `401` body so callers cannot tell the causes apart.
fn classify_auth_error(err: &AuthError) -> (StatusCode, &'static str, String) {
    match err {
        AuthError::InvalidDestination(msg) => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
        }
        AuthError::UnknownDestination => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
        AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", err.to_string()),
        AuthError::Issue(msg) => {
            tracing::error!(error = %msg, "Token issuance failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE.to_string(),
            )
        }
    }
}
