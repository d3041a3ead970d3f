//! Route definitions for the `/users` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /       -> list_users (requires auth)
/// POST   /       -> create_user
/// GET    /{id}   -> get_user (requires auth)
/// PATCH  /{id}   -> update_user (requires auth)
/// DELETE /{id}   -> delete_user (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route(
            "/{id}",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
}
