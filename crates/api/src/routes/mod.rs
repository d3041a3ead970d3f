pub mod auth;
pub mod health;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the application route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                      liveness and store reachability (public)
///
/// /auth/login                  request a magic link (public)
/// /auth/login/callback         exchange link token for session token (public)
/// /auth/profile                current user (requires auth)
///
/// /users                       list (requires auth), register (public)
/// /users/{id}                  get, update, delete (requires auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        // Passwordless login and the bearer-gated profile.
        .nest("/auth", auth::router())
        // User registry.
        .nest("/users", users::router())
}
