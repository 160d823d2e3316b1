use chrono::{DateTime, Utc};
use serde::Serialize;

use vigil_core::models::{PeerOutcome, QueryFailure};

/// Run-loop counters, reset only on restart.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EpochMetrics {
    pub epochs_completed: u64,
    pub epochs_failed: u64,
    pub forward_passes: u64,
    pub peer_successes: u64,
    pub peer_failures: u64,
    pub peer_timeouts: u64,
    /// Peers dropped by the dispatcher before they could answer: never
    /// dispatched or cut by the fan-out deadline.
    pub peers_not_queried: u64,
    pub submissions_accepted: u64,
    pub submissions_rejected: u64,
    pub submissions_failed: u64,
    pub roster_refresh_failures: u64,
    pub saves: u64,
    pub save_failures: u64,
    pub last_epoch_at: Option<DateTime<Utc>>,
}

impl EpochMetrics {
    /// All counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the outcome of one fan-out.
    pub fn record_fanout(&mut self, outcomes: &[PeerOutcome]) {
        self.forward_passes += 1;
        for outcome in outcomes {
            match &outcome.result {
                Ok(_) => self.peer_successes += 1,
                Err(QueryFailure::Timeout { .. }) => {
                    self.peer_failures += 1;
                    self.peer_timeouts += 1;
                }
                Err(failure) if !failure.is_peer_fault() => self.peers_not_queried += 1,
                Err(_) => self.peer_failures += 1,
            }
        }
    }

    /// Count one finished epoch and stamp its completion time.
    pub fn record_epoch(&mut self, success: bool) {
        if success {
            self.epochs_completed += 1;
        } else {
            self.epochs_failed += 1;
        }
        self.last_epoch_at = Some(Utc::now());
    }

    /// Count a weight submission: `Some(accepted)` when the ledger answered,
    /// `None` when the write itself failed.
    pub fn record_submission(&mut self, accepted: Option<bool>) {
        match accepted {
            Some(true) => self.submissions_accepted += 1,
            Some(false) => self.submissions_rejected += 1,
            None => self.submissions_failed += 1,
        }
    }

    /// Count one state save attempt.
    pub fn record_save(&mut self, success: bool) {
        if success {
            self.saves += 1;
        } else {
            self.save_failures += 1;
        }
    }

    /// Count a roster refresh that fell back to the previous snapshot.
    pub fn record_roster_failure(&mut self) {
        self.roster_refresh_failures += 1;
    }

    /// Fraction of queried peers that answered, or `None` before any query.
    /// Peers the dispatcher never got to are left out.
    pub fn peer_success_rate(&self) -> Option<f64> {
        let total = self.peer_successes + self.peer_failures;
        (total > 0).then(|| self.peer_successes as f64 / total as f64)
    }

    /// Serialize for a status endpoint.
    pub fn snapshot(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
