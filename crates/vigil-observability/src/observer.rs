//! [`IRunObserver`] implementations.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use vigil_core::models::RunEvent;
use vigil_core::traits::IRunObserver;

/// Forwards every event to `tracing` at a level matching its severity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl IRunObserver for TracingObserver {
    fn observe(&self, event: &RunEvent) {
        match event {
            RunEvent::Started { step, height } => {
                info!(step, height, "validator started")
            }
            RunEvent::Stopped { step } => info!(step, "validator stopped"),
            RunEvent::NanRewards { ordinals } => {
                warn!(?ordinals, "NaN rewards sanitized to 0")
            }
            RunEvent::RewardSkipped { ordinal, reason } => {
                warn!(ordinal, ?reason, "reward skipped")
            }
            RunEvent::ScoresReset { ordinals } => {
                info!(?ordinals, "replaced identities, scores reset")
            }
            RunEvent::RosterRefreshFailed { error } => {
                warn!(%error, "roster refresh failed, keeping previous snapshot")
            }
            RunEvent::PeerQueryFailed {
                ordinal,
                identity,
                error,
            } => debug!(ordinal, %identity, %error, "peer query failed"),
            RunEvent::WeightsSubmitted {
                height,
                entries,
                success: true,
                ..
            } => info!(height, entries, "weights submitted"),
            RunEvent::WeightsSubmitted {
                height,
                entries,
                message,
                ..
            } => error!(height, entries, %message, "weights rejected by ledger"),
            RunEvent::WeightsSubmitFailed { error } => {
                error!(%error, "weight submission failed")
            }
            RunEvent::StateSaved { step } => debug!(step, "state saved"),
            RunEvent::StateSaveFailed { error } => error!(%error, "state save failed"),
            RunEvent::EpochFailed { step, error } => {
                error!(step, %error, "epoch failed, continuing")
            }
            RunEvent::Status(status) => info!(
                step = status.step,
                height = status.height,
                roster = status.roster_size,
                top = ?status.top_scores,
                "status"
            ),
        }
    }
}

/// Keeps every event in memory. Used by tests and status endpoints.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<RunEvent>>,
}

impl RecordingObserver {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything observed so far.
    pub fn events(&self) -> Vec<RunEvent> {
        self.events.lock().clone()
    }

    /// Number of events matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&RunEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|e| predicate(e)).count()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl IRunObserver for RecordingObserver {
    fn observe(&self, event: &RunEvent) {
        self.events.lock().push(event.clone());
    }
}

/// Delivers each event to several observers in order.
#[derive(Default)]
pub struct FanoutObserver {
    targets: Vec<Arc<dyn IRunObserver>>,
}

impl FanoutObserver {
    /// Deliver to `targets` in order.
    pub fn new(targets: Vec<Arc<dyn IRunObserver>>) -> Self {
        Self { targets }
    }

    /// Append one more target.
    pub fn with(mut self, target: Arc<dyn IRunObserver>) -> Self {
        self.targets.push(target);
        self
    }
}

impl IRunObserver for FanoutObserver {
    fn observe(&self, event: &RunEvent) {
        for target in &self.targets {
            target.observe(event);
        }
    }
}
