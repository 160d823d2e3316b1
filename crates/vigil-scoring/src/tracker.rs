//! ScoreTracker: identity-indexed EMA score vector.
//!
//! Scores are stored by ordinal, but every ordinal is bound to the identity
//! it pointed at when the roster was last reconciled. A changed binding means
//! the peer was replaced, so its accumulated score is discarded.
//!
//! Update rule for each rewarded ordinal:
//! `score = alpha * reward + (1 - alpha) * score`
//!
//! Ordinals absent from a batch are left untouched.

use std::sync::Arc;

use tracing::debug;

use vigil_core::errors::{StorageError, VigilError, VigilResult};
use vigil_core::models::{
    Identity, IdentityTable, PersistedState, RewardBatch, RosterSnapshot, RunEvent, SkipReason,
};
use vigil_core::traits::IRunObserver;

/// What a single `update` call did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Entries folded into the EMA.
    pub applied: usize,
    /// Ordinals whose non-finite reward was replaced by 0.
    pub sanitized: Vec<usize>,
    /// Entries dropped because the ordinal was out of range or rebound.
    pub skipped: usize,
}

/// Mutable per-peer score state owned by the run loop.
pub struct ScoreTracker {
    scores: Vec<f64>,
    identities: IdentityTable,
    observer: Arc<dyn IRunObserver>,
}

impl ScoreTracker {
    /// Empty tracker. The first `reconcile` sizes it to the roster.
    pub fn new(observer: Arc<dyn IRunObserver>) -> Self {
        Self {
            scores: Vec::new(),
            identities: IdentityTable::default(),
            observer,
        }
    }

    /// Rebuild a tracker from persisted state.
    pub fn from_state(state: PersistedState, observer: Arc<dyn IRunObserver>) -> VigilResult<Self> {
        let mut tracker = Self::new(observer);
        tracker.restore(state)?;
        Ok(tracker)
    }

    /// Replace the held state with a persisted one.
    ///
    /// Rejects states whose score and identity tables disagree in length or
    /// that carry non-finite scores; the current state is kept in that case.
    pub fn restore(&mut self, state: PersistedState) -> VigilResult<()> {
        if !state.is_consistent() {
            return Err(StorageError::CorruptState {
                details: format!(
                    "{} scores for {} identities",
                    state.scores.len(),
                    state.identities.len()
                ),
            }
            .into());
        }
        if let Some(ordinal) = state.scores.iter().position(|s| !s.is_finite()) {
            return Err(StorageError::CorruptState {
                details: format!("non-finite score at ordinal {ordinal}"),
            }
            .into());
        }
        self.scores = state.scores;
        self.identities = state.identities;
        Ok(())
    }

    /// Align the score vector with a fresh roster.
    ///
    /// Keeps the score of every ordinal whose identity is unchanged, zeroes
    /// replaced and new ordinals, and resizes to the roster length.
    pub fn reconcile(&mut self, snapshot: &RosterSnapshot) {
        let previous = self.identities.len();
        let mut reset = Vec::new();

        let scores: Vec<f64> = snapshot
            .peers()
            .iter()
            .map(|peer| match self.identities.get(peer.ordinal) {
                Some(known) if *known == peer.identity => self.scores[peer.ordinal],
                Some(_) => {
                    reset.push(peer.ordinal);
                    0.0
                }
                None => 0.0,
            })
            .collect();

        if snapshot.len() < previous {
            debug!(
                from = previous,
                to = snapshot.len(),
                "roster shrank, truncating scores"
            );
        }
        if !reset.is_empty() {
            self.observer.observe(&RunEvent::ScoresReset { ordinals: reset });
        }

        self.scores = scores;
        self.identities = snapshot.identity_table();
    }

    /// Fold one batch of rewards into the EMA.
    ///
    /// Non-finite rewards count as 0 and are reported. Entries whose ordinal
    /// is out of range, or whose recorded identity no longer matches the
    /// tracker's binding, are skipped.
    pub fn update(&mut self, rewards: &RewardBatch, alpha: f64) -> VigilResult<UpdateReport> {
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(VigilError::ValidationError(format!(
                "moving average alpha must be in (0, 1], got {alpha}"
            )));
        }

        let mut report = UpdateReport::default();
        for entry in rewards.entries() {
            let ordinal = entry.ordinal;
            if ordinal >= self.scores.len() {
                self.skip(
                    ordinal,
                    SkipReason::OutOfRange {
                        len: self.scores.len(),
                    },
                );
                report.skipped += 1;
                continue;
            }
            if let Some(expected) = &entry.identity {
                let found = &self.identities.as_slice()[ordinal];
                if found != expected {
                    self.skip(
                        ordinal,
                        SkipReason::IdentityMismatch {
                            expected: expected.clone(),
                            found: found.clone(),
                        },
                    );
                    report.skipped += 1;
                    continue;
                }
            }

            let reward = if entry.reward.is_finite() {
                entry.reward
            } else {
                report.sanitized.push(ordinal);
                0.0
            };
            self.scores[ordinal] = alpha * reward + (1.0 - alpha) * self.scores[ordinal];
            report.applied += 1;
        }

        if !report.sanitized.is_empty() {
            self.observer.observe(&RunEvent::NanRewards {
                ordinals: report.sanitized.clone(),
            });
        }
        debug!(applied = report.applied, skipped = report.skipped, "scores updated");
        Ok(report)
    }

    fn skip(&self, ordinal: usize, reason: SkipReason) {
        self.observer
            .observe(&RunEvent::RewardSkipped { ordinal, reason });
    }

    /// Scores in ordinal order.
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Score of `ordinal`, if in range.
    pub fn score(&self, ordinal: usize) -> Option<f64> {
        self.scores.get(ordinal).copied()
    }

    /// Identity each score is bound to.
    pub fn identities(&self) -> &IdentityTable {
        &self.identities
    }

    /// Number of tracked ordinals.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Score currently held for `identity`, looked up through the binding.
    pub fn score_of(&self, identity: &Identity) -> Option<f64> {
        self.identities
            .iter()
            .position(|known| known == identity)
            .map(|ordinal| self.scores[ordinal])
    }

    /// Highest `top_n` scores with their identities, descending. Ties keep
    /// roster order.
    pub fn summary(&self, top_n: usize) -> Vec<(Identity, f64)> {
        let mut ranked: Vec<(usize, f64)> = self.scores.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
            .into_iter()
            .take(top_n)
            .map(|(ordinal, score)| (self.identities.as_slice()[ordinal].clone(), score))
            .collect()
    }

    /// Capture the state for persistence.
    pub fn snapshot(&self, step: u64) -> PersistedState {
        PersistedState {
            step,
            scores: self.scores.clone(),
            identities: self.identities.clone(),
        }
    }
}
