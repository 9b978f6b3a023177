//! # rolesync-service
//!
//! Application layer: the role reconciliation engine and the caches it owns.

pub mod dto;
pub mod services;

pub use dto::{HealthResponse, SweepReport, WebhookResponse};
pub use services::{
    RecordResolver, ServiceContext, ServiceError, ServiceResult, SyncEngine, SyncSettings, Throttle,
};
