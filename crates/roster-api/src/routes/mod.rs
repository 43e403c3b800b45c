//! Route definitions

use axum::{routing::get, Router};

use crate::handlers::{health, members};
use crate::state::AppState;

/// Member endpoints
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/members", get(members::list_members).post(members::create_member))
        .route("/members/:id", get(members::get_member_username))
}

/// Liveness and readiness probes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}
