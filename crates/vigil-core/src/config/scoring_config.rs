use serde::{Deserialize, Serialize};

use super::defaults;

/// Score tracking and weight encoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// EMA weight of the newest reward, in (0, 1]. Default: 0.1.
    pub moving_average_alpha: f64,
    /// Version key attached to every weight submission.
    pub version_key: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            moving_average_alpha: defaults::DEFAULT_MOVING_AVERAGE_ALPHA,
            version_key: defaults::DEFAULT_VERSION_KEY,
        }
    }
}
