use serde::{Deserialize, Serialize};

use super::Identity;

/// One scored peer of a forward pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardEntry {
    pub ordinal: usize,
    /// Identity the ordinal was bound to when the peer was queried.
    /// `None` skips the identity check.
    pub identity: Option<Identity>,
    pub reward: f64,
}

/// Sparse set of rewards produced by one forward pass. May contain NaN.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardBatch {
    entries: Vec<RewardEntry>,
}

impl RewardBatch {
    /// Empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an unbound batch from `(ordinal, reward)` pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (usize, f64)>) -> Self {
        Self {
            entries: pairs
                .into_iter()
                .map(|(ordinal, reward)| RewardEntry {
                    ordinal,
                    identity: None,
                    reward,
                })
                .collect(),
        }
    }

    /// Add a reward without an identity check.
    pub fn push(&mut self, ordinal: usize, reward: f64) {
        self.entries.push(RewardEntry {
            ordinal,
            identity: None,
            reward,
        });
    }

    /// Add a reward tied to the identity observed at query time.
    pub fn push_bound(&mut self, ordinal: usize, identity: Identity, reward: f64) {
        self.entries.push(RewardEntry {
            ordinal,
            identity: Some(identity),
            reward,
        });
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[RewardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
