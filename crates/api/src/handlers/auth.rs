//! Handlers for the `/auth` resource (magic-link login, callback, profile).

use archivist_db::models::user::User;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::strategy::CallbackPayload;
use crate::auth::TokenResponse;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub destination: String,
}

/// Response body for `POST /auth/login`.
///
/// Identical whether or not the link could actually be delivered.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /auth/login
///
/// Validate the destination, confirm it belongs to a user, and send a magic
/// link to it.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>> {
    let Json(input) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    state.auth.request_login(&input.destination).await?;

    Ok(Json(LoginResponse { success: true }))
}

/// GET /auth/login/callback?token=...
///
/// Exchange a valid magic-link token for a session token. An unparseable
/// query string is treated like a missing token (401).
pub async fn login_callback(
    State(state): State<AppState>,
    query: Result<Query<CallbackPayload>, QueryRejection>,
) -> AppResult<Json<TokenResponse>> {
    let payload = query.map(|Query(payload)| payload).unwrap_or_default();
    let tokens = state.auth.complete_login(&payload).await?;
    Ok(Json(tokens))
}

/// GET /auth/profile
///
/// Return the user the bearer token resolves to.
pub async fn profile(auth_user: AuthUser) -> Json<DataResponse<User>> {
    Json(DataResponse {
        data: auth_user.user,
    })
}
