use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{error, info, instrument, warn};

use crate::assets::{AssetMirror, MirrorState};
use crate::scoring::ScoreTableProvider;

/// Configuration for the refresh task
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Delay before the first cycle
    pub initial_delay: Duration,
    /// How often to run a cycle after the first one
    pub interval: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            interval: Duration::from_secs(6 * 60 * 60), // 6 hours
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RefreshOutcome {
    Completed {
        /// Entries in the new weight table; `None` when the refresh failed and
        /// the previous table was kept
        table_entries: Option<usize>,
        mirror: String,
    },
    /// Another cycle was already running
    Skipped,
}

/// Drives the weight table refresh and the asset mirror sync, one cycle at a time
pub struct RefreshCoordinator {
    scores: Arc<ScoreTableProvider>,
    mirror: Arc<AssetMirror>,
    in_flight: Mutex<()>,
}

impl RefreshCoordinator {
    pub fn new(scores: Arc<ScoreTableProvider>, mirror: Arc<AssetMirror>) -> Self {
        Self {
            scores,
            mirror,
            in_flight: Mutex::new(()),
        }
    }

    /// Runs one cycle: weight table first, then the mirror.
    ///
    /// Returns `Skipped` immediately if a cycle is already in flight.
    #[instrument(skip(self))]
    pub async fn run_once(&self) -> RefreshOutcome {
        let Ok(_guard) = self.in_flight.try_lock() else {
            warn!("Refresh already in flight; skipping");
            return RefreshOutcome::Skipped;
        };

        let table_entries = match self.scores.refresh().await {
            Ok(entries) => Some(entries),
            Err(e) => {
                error!(error = %e, "Weight table refresh failed; keeping previous table");
                None
            }
        };

        let mirror = self.mirror.sync().await;
        info!(table_entries = ?table_entries, mirror = ?mirror, "Refresh cycle completed");

        RefreshOutcome::Completed {
            table_entries,
            mirror: mirror_label(mirror).to_string(),
        }
    }
}

fn mirror_label(state: MirrorState) -> &'static str {
    match state {
        MirrorState::Absent => "absent",
        MirrorState::Present => "present",
        MirrorState::Syncing => "syncing",
        MirrorState::Corrupt => "corrupt",
    }
}

/// Starts the background task that refreshes scoring data and assets
#[instrument(skip(coordinator))]
pub async fn start_refresh_task(coordinator: Arc<RefreshCoordinator>, config: RefreshConfig) {
    info!(
        initial_delay_secs = config.initial_delay.as_secs(),
        interval_secs = config.interval.as_secs(),
        "Starting refresh background task"
    );

    sleep(config.initial_delay).await;

    let mut refresh_interval = interval(config.interval);
    refresh_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        // first tick completes immediately
        refresh_interval.tick().await;

        info!("Running refresh cycle");
        coordinator.run_once().await;
    }
}
