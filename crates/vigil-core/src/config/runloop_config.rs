use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Epoch timing and cadence of the control loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunLoopConfig {
    /// Ledger height advances between two epochs. Default: 100.
    pub epoch_length: u64,
    /// Sleep between two height polls while waiting for the next epoch.
    pub poll_interval_ms: u64,
    /// Forward passes launched concurrently inside one epoch (K).
    pub num_concurrent_forwards: usize,
    /// Submit weights every N epochs. Never at step 0.
    pub weights_every_epochs: u64,
    /// Persist tracker state every N epochs.
    pub save_every_epochs: u64,
    /// Upper bound on a single ledger write.
    pub ledger_write_timeout_ms: u64,
    /// How long `stop()` waits for the background thread before abandoning it.
    pub stop_timeout_ms: u64,
    /// Skip weight submission entirely (observe-only validator).
    pub disable_set_weights: bool,
}

impl RunLoopConfig {
    /// `poll_interval_ms` as a `Duration`.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// `ledger_write_timeout_ms` as a `Duration`.
    pub fn ledger_write_timeout(&self) -> Duration {
        Duration::from_millis(self.ledger_write_timeout_ms)
    }

    /// `stop_timeout_ms` as a `Duration`.
    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_ms)
    }
}

impl Default for RunLoopConfig {
    fn default() -> Self {
        Self {
            epoch_length: defaults::DEFAULT_EPOCH_LENGTH,
            poll_interval_ms: defaults::DEFAULT_POLL_INTERVAL_MS,
            num_concurrent_forwards: defaults::DEFAULT_NUM_CONCURRENT_FORWARDS,
            weights_every_epochs: defaults::DEFAULT_WEIGHTS_EVERY_EPOCHS,
            save_every_epochs: defaults::DEFAULT_SAVE_EVERY_EPOCHS,
            ledger_write_timeout_ms: defaults::DEFAULT_LEDGER_WRITE_TIMEOUT_MS,
            stop_timeout_ms: defaults::DEFAULT_STOP_TIMEOUT_MS,
            disable_set_weights: defaults::DEFAULT_DISABLE_SET_WEIGHTS,
        }
    }
}
