//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::sync::Arc;

use axum::Router;
use rolesync_clients::{DiscordClient, NotionClient};
use rolesync_common::{AppConfig, AppError};
use rolesync_service::{ServiceContext, SyncEngine, SyncSettings, Throttle};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::middleware::{apply_middleware, apply_tracing};
use crate::routes::{create_router, sync_routes};
use crate::scheduler::{spawn_sweeps, SweepSchedule};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
///
/// The sweep trigger is mounted outside the request timeout.
pub fn create_app(state: AppState) -> Router {
    let timed = apply_middleware(create_router(&state.server().path));
    let untimed = apply_tracing(sync_routes());
    timed.merge(untimed).with_state(state)
}

/// Build both adapters, take the startup snapshots, and create `AppState`
pub async fn create_app_state(config: &AppConfig) -> Result<AppState, AppError> {
    let database = Arc::new(NotionClient::new(&config.notion)?);
    let platform = Arc::new(DiscordClient::new(&config.discord)?);
    let settings = SyncSettings::from_config(config)?;
    let throttle = Throttle::new(config.sync.request_delay());

    let ctx = ServiceContext::new(database, platform, throttle, settings);

    info!("Taking role and member snapshots...");
    let engine = SyncEngine::start(ctx).await?;

    Ok(AppState::new(Arc::new(engine), config.webhook.clone()))
}

/// Run the HTTP server until a shutdown signal arrives
pub async fn run_server(app: Router, addr: &str) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.webhook.address();

    let state = create_app_state(&config).await?;
    let sweeps = spawn_sweeps(state.engine_handle(), SweepSchedule::from_config(&config.sync));

    let app = create_app(state);
    let result = run_server(app, &addr).await;

    if let Some(handle) = sweeps {
        handle.abort();
    }
    result
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
