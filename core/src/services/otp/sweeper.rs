//! Periodic purge of stale OTP records
//!
//! Records past expiry plus the grace window are deleted on a fixed
//! interval, whether or not they were ever verified.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::domain::value_objects::SweepReport;

use super::config::SweepConfig;
use super::manager::OtpLifecycleManager;

/// Background sweeper for an [`OtpLifecycleManager`]
pub struct OtpSweeper {
    manager: Arc<OtpLifecycleManager>,
    config: SweepConfig,
}

impl OtpSweeper {
    /// Create a new sweeper
    pub fn new(manager: Arc<OtpLifecycleManager>, config: SweepConfig) -> Self {
        Self { manager, config }
    }

    /// Run a single sweep pass
    pub fn run_once(&self) -> SweepReport {
        if !self.config.enabled {
            return SweepReport::default();
        }
        self.manager.sweep()
    }

    /// Start the sweeper as a background task
    ///
    /// Spawns a tokio task that sweeps at the configured interval, the first
    /// pass running immediately. Each pass runs on the blocking pool since it
    /// holds the record lock while the store is written. Returns `None` when
    /// sweeping is disabled.
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("OTP sweeper is disabled");
            return None;
        }

        let period = Duration::from_secs(self.config.interval_seconds.max(1));

        Some(tokio::spawn(async move {
            info!(
                "OTP sweeper started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(period);
            interval_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval_timer.tick().await;

                let sweeper = self.clone();
                if let Err(e) = tokio::task::spawn_blocking(move || sweeper.run_once()).await {
                    error!("OTP sweep pass panicked: {}", e);
                }
            }
        }))
    }
}
