use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Peer selection and request fan-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Peers queried per forward pass. Default: 50.
    pub sample_size: usize,
    /// Per-peer query timeout.
    pub query_timeout_ms: u64,
    /// Maximum peer calls in flight at once, shared by every concurrent
    /// forward pass of an epoch. Peers left waiting past the fan-out
    /// deadline are not queried and earn no reward that pass.
    pub max_in_flight: usize,
    /// Permitted validators staking more than this are never queried.
    pub vpermit_stake_limit: f64,
    /// Extra time granted on top of the timeout before a peer is marked failed.
    pub timeout_slack_ms: u64,
}

impl DispatchConfig {
    /// `query_timeout_ms` as a `Duration`.
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    /// `timeout_slack_ms` as a `Duration`.
    pub fn timeout_slack(&self) -> Duration {
        Duration::from_millis(self.timeout_slack_ms)
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            sample_size: defaults::DEFAULT_SAMPLE_SIZE,
            query_timeout_ms: defaults::DEFAULT_QUERY_TIMEOUT_MS,
            max_in_flight: defaults::DEFAULT_MAX_IN_FLIGHT,
            vpermit_stake_limit: defaults::DEFAULT_VPERMIT_STAKE_LIMIT,
            timeout_slack_ms: defaults::DEFAULT_TIMEOUT_SLACK_MS,
        }
    }
}
