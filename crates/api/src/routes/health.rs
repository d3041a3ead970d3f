//! Liveness endpoint. Always answers `200`; store trouble shows up in the body.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthReport {
    /// `"ok"`, or `"degraded"` while the identity store is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    /// Result of [`UserStore::ping`](archivist_db::store::UserStore::ping).
    #[serde(rename = "db_healthy")]
    pub store_reachable: bool,
}

impl HealthReport {
    fn new(store_reachable: bool) -> Self {
        Self {
            status: if store_reachable { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            store_reachable,
        }
    }
}

async fn report(State(state): State<AppState>) -> Json<HealthReport> {
    if let Err(err) = state.users.ping().await {
        tracing::warn!(error = %err, "Identity store unreachable");
        return Json(HealthReport::new(false));
    }
    Json(HealthReport::new(true))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(report))
}
