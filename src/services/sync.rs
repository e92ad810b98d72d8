use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use tokio::time::{self, MissedTickBehavior};
use tracing::{info, warn};

use crate::config::SyncConfig;
use crate::services::MatchService;

/// Periodic sync task: one pass at startup, then one per interval, each
/// under its own deadline. Failed ticks are logged and the loop continues.
pub struct SyncRunner {
    service: Arc<MatchService>,
    config: SyncConfig,
}

impl SyncRunner {
    pub fn new(service: Arc<MatchService>, config: SyncConfig) -> Self {
        Self { service, config }
    }

    pub async fn run(self) {
        let mut ticker = time::interval(self.config.interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            interval_secs = self.config.interval_secs,
            horizon_days = self.config.horizon_days,
            "match sync started"
        );

        // The first interval tick fires immediately, giving the startup run.
        let mut trigger = "startup";
        loop {
            ticker.tick().await;
            self.run_once(trigger).await;
            trigger = "ticker";
        }
    }

    async fn run_once(&self, trigger: &str) {
        let from = Utc::now();
        let to = from + ChronoDuration::days(self.config.horizon_days.max(1));

        let tick = self.service.sync_upcoming(from, to, self.config.limit);
        match time::timeout(self.config.request_timeout(), tick).await {
            Err(_) => {
                warn!(trigger, "upcoming matches sync timed out");
            }
            Ok(Err(err)) => {
                warn!(trigger, error = %err, "upcoming matches sync failed");
            }
            Ok(Ok(outcome)) => {
                info!(
                    trigger,
                    requested = outcome.requested,
                    saved = outcome.saved,
                    failed = outcome.failed,
                    "upcoming matches sync completed"
                );
            }
        }
    }
}
