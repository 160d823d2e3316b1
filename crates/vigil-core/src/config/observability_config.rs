use serde::{Deserialize, Serialize};

use super::defaults;

/// Logging and status output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// `EnvFilter` directive used when `VIGIL_LOG` is unset.
    pub log_filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json_logs: bool,
    /// Number of highest-scoring identities included in each status line.
    pub status_top_n: usize,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: defaults::DEFAULT_LOG_FILTER.to_string(),
            json_logs: defaults::DEFAULT_JSON_LOGS,
            status_top_n: defaults::DEFAULT_STATUS_TOP_N,
        }
    }
}
