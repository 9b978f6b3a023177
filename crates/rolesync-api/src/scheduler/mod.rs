//! Background sweeps
//!
//! An optional sweep right after startup and an optional fixed-interval
//! sweep, both running off the request path.

use std::sync::Arc;
use std::time::Duration;

use rolesync_common::SyncConfig;
use rolesync_service::{ServiceError, SyncEngine};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info, warn};

/// When and how background sweeps run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepSchedule {
    pub on_startup: bool,
    pub dry_run: bool,
    pub interval: Option<Duration>,
}

impl SweepSchedule {
    /// A zero interval disables scheduling
    #[must_use]
    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            on_startup: config.on_startup,
            dry_run: config.dry_run,
            interval: config
                .interval_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.on_startup || self.interval.is_some()
    }
}

/// Spawn the sweep loop, or nothing when no sweep is scheduled
pub fn spawn_sweeps(engine: Arc<SyncEngine>, schedule: SweepSchedule) -> Option<JoinHandle<()>> {
    if !schedule.is_enabled() {
        return None;
    }

    Some(tokio::spawn(async move {
        if schedule.on_startup {
            run_sweep(&engine, schedule.dry_run, "startup").await;
        }

        let Some(period) = schedule.interval else {
            return;
        };
        info!(period_secs = period.as_secs(), "Scheduled sweeps enabled");

        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            run_sweep(&engine, schedule.dry_run, "interval").await;
        }
    }))
}

async fn run_sweep(engine: &SyncEngine, dry_run: bool, trigger: &'static str) {
    match engine.sweep_all(dry_run).await {
        Ok(report) => info!(
            trigger,
            dry_run,
            records = report.records,
            matched = report.matched,
            marked_inactive = report.marked_inactive,
            "Background sweep completed"
        ),
        Err(ServiceError::SweepInProgress) => {
            warn!(trigger, "Another sweep is running, skipping");
        }
        Err(e) => error!(trigger, error = %e, "Background sweep failed"),
    }
}
