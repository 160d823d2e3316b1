use serde::{Deserialize, Serialize};

use super::IdentityTable;

/// Tracker state saved and restored as one atomic unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    pub step: u64,
    pub scores: Vec<f64>,
    pub identities: IdentityTable,
}

impl PersistedState {
    /// Scores and identities must describe the same roster.
    pub fn is_consistent(&self) -> bool {
        self.scores.len() == self.identities.len()
    }
}
