//! Lifecycle state and the cross-thread status view.

use std::fmt;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;

use vigil_core::models::Identity;
use vigil_observability::EpochMetrics;
use vigil_scoring::ScoreTracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Idle,
    Running,
    Stopping,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Stopping => "stopping",
        };
        f.write_str(name)
    }
}

/// Where the loop is. `step` counts completed epochs.
#[derive(Debug, Clone, Default)]
pub(crate) struct Progress {
    pub step: u64,
    pub height: u64,
    pub last_epoch_at: Option<DateTime<Utc>>,
}

/// State the background thread writes and `status()` reads.
pub(crate) struct Shared {
    pub tracker: RwLock<ScoreTracker>,
    pub progress: RwLock<Progress>,
    pub metrics: Mutex<EpochMetrics>,
}

impl Shared {
    pub fn new(tracker: ScoreTracker) -> Self {
        Self {
            tracker: RwLock::new(tracker),
            progress: RwLock::new(Progress::default()),
            metrics: Mutex::new(EpochMetrics::new()),
        }
    }
}

/// Point-in-time view of a controller, safe to take from any thread.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub state: RunState,
    pub step: u64,
    pub height: u64,
    pub last_epoch_at: Option<DateTime<Utc>>,
    /// Every tracked identity with its score, in roster order.
    pub scores: Vec<(Identity, f64)>,
    pub metrics: EpochMetrics,
}

impl StatusReport {
    /// Score of `identity`, if it is in the roster.
    pub fn score_of(&self, identity: &Identity) -> Option<f64> {
        self.scores
            .iter()
            .find(|(known, _)| known == identity)
            .map(|(_, score)| *score)
    }
}
