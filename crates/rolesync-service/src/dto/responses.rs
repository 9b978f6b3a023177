//! Response DTOs
//!
//! Serialized as JSON by the HTTP surface.

use chrono::{DateTime, Utc};
use rolesync_core::Snowflake;
use serde::{Deserialize, Serialize};

/// Outcome of one full sweep
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    pub dry_run: bool,
    /// Database records visited
    pub records: usize,
    /// Distinct guild members matched by some record
    pub matched: usize,
    /// Guild members no record matched
    pub unseen: usize,
    /// Unseen members granted the inactive role during this sweep
    pub marked_inactive: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SweepReport {
    /// Start an empty report stamped with the current time
    pub fn begin(dry_run: bool) -> Self {
        let now = Utc::now();
        Self {
            dry_run,
            records: 0,
            matched: 0,
            unseen: 0,
            marked_inactive: 0,
            started_at: now,
            finished_at: now,
        }
    }

    /// Stamp the finish time
    pub fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self
    }

    /// Wall-clock duration in milliseconds
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Whether a full sweep is running right now
    pub sweeping: bool,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn ok(sweeping: bool) -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            sweeping,
            timestamp: Utc::now(),
        }
    }
}

/// Outcome of a webhook delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookResponse {
    /// Member the record matched; `None` when dropped or unmatched
    pub matched: Option<Snowflake>,
}
