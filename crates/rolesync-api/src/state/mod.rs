//! Application state
//!
//! Holds the shared state for the Axum application: the started engine and
//! the listener configuration.

use std::sync::Arc;

use rolesync_common::ServerConfig;
use rolesync_service::SyncEngine;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    engine: Arc<SyncEngine>,
    server: Arc<ServerConfig>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(engine: Arc<SyncEngine>, server: ServerConfig) -> Self {
        Self {
            engine,
            server: Arc::new(server),
        }
    }

    /// Get the reconciliation engine
    pub fn engine(&self) -> &SyncEngine {
        &self.engine
    }

    /// Shared handle to the engine, for background tasks
    pub fn engine_handle(&self) -> Arc<SyncEngine> {
        Arc::clone(&self.engine)
    }

    /// Get the listener configuration
    pub fn server(&self) -> &ServerConfig {
        &self.server
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("engine", &self.engine)
            .field("server", &self.server)
            .finish()
    }
}
