//! Health check handler

use axum::{extract::State, Json};
use rolesync_service::HealthResponse;

use crate::state::AppState;

/// Liveness check
///
/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(state.engine().is_sweeping()))
}
