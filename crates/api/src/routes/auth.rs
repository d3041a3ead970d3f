//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /login             -> login
/// GET  /login/callback    -> login_callback
/// GET  /profile           -> profile (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/login/callback", get(auth::login_callback))
        .route("/profile", get(auth::profile))
}
