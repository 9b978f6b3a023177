//! # rolesync-api
//!
//! HTTP surface built with Axum: the change-notification webhook, a manual
//! sweep trigger, and health checks. Also hosts the sweep scheduler.

pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod scheduler;
pub mod server;
pub mod state;

pub use server::{create_app, run};
pub use state::AppState;
