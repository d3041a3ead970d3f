//! Handlers for the `/users` resource.
//!
//! Registration is public; every other operation requires a session token.

use archivist_core::error::CoreError;
use archivist_core::types::DbId;
use archivist_db::models::user::{CreateUser, UpdateUser, User};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email, length(max = 254))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub name: String,
}

/// Request body for `PATCH /users/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email, length(max = 254))]
    pub email: Option<String>,
    #[validate(length(max = 200))]
    pub name: Option<String>,
}

fn check<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<User>>)> {
    check(&input)?;

    let user = state
        .users
        .create(&CreateUser {
            email: input.email,
            name: input.name,
        })
        .await?;
    tracing::info!(user_id = user.id, "User registered");

    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<User>>>> {
    let users = state.users.find_all().await?;
    Ok(Json(DataResponse { data: users }))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<User>>> {
    let user = state.users.find_by_id(id).await?;
    Ok(Json(DataResponse { data: user }))
}

/// PATCH /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<User>>> {
    check(&input)?;

    let update = UpdateUser {
        email: input.email,
        name: input.name,
    };
    let user = state.users.update(id, &update).await?;
    Ok(Json(DataResponse { data: user }))
}

/// DELETE /users/{id}
///
/// Outstanding session tokens of the removed user stop working immediately.
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.users.remove(id).await?;
    tracing::info!(user_id = id, removed_by = auth.user.id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
