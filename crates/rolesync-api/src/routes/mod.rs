//! Route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{health, sync, webhook};
use crate::state::AppState;

/// Change-notification route plus health checks
pub fn create_router(webhook_path: &str) -> Router<AppState> {
    Router::new()
        .route(&normalize_path(webhook_path), post(webhook::receive))
        .merge(health_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health::health_check))
}

/// Manual sweep trigger (mounted without the request timeout)
pub fn sync_routes() -> Router<AppState> {
    Router::new().route("/sync", post(sync::run_sweep))
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
