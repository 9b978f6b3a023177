//! Data transfer objects returned by the engine and the HTTP surface

pub mod responses;

pub use responses::{HealthResponse, SweepReport, WebhookResponse};
