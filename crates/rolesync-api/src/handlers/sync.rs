//! Manual sweep handler

use axum::{
    extract::{Query, State},
    Json,
};
use rolesync_service::SweepReport;
use serde::Deserialize;

use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Query parameters for a manual sweep
#[derive(Debug, Deserialize)]
pub struct SweepQuery {
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,
}

fn default_dry_run() -> bool {
    true
}

/// Run a full sweep and return its report
///
/// POST /sync?dry_run=<bool>
pub async fn run_sweep(
    State(state): State<AppState>,
    Query(query): Query<SweepQuery>,
) -> ApiResult<Json<SweepReport>> {
    // Detached so a dropped connection does not cut the sweep short
    let engine = state.engine_handle();
    let report = tokio::spawn(async move { engine.sweep_all(query.dry_run).await })
        .await
        .map_err(ApiError::internal)??;

    Ok(Json(report))
}
