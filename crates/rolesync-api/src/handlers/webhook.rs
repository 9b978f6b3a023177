//! Change-notification handler

use axum::{body::Bytes, extract::State, Json};
use rolesync_service::WebhookResponse;
use serde_json::Value;
use tracing::{info, warn};

use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Reconcile the record carried by a database automation
///
/// POST {webhook path}
pub async fn receive(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<WebhookResponse>> {
    let payload: Value = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "Webhook body is not JSON");
        ApiError::invalid_body(e.to_string())
    })?;

    let matched = state
        .engine()
        .handle_webhook(&payload)
        .await?
        .map(|member| member.user_id);

    info!(matched = ?matched, "Webhook processed");
    Ok(Json(WebhookResponse { matched }))
}
