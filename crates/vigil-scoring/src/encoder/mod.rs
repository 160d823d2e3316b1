//! WeightEncoder: deterministic score vector → ledger submission.
//!
//! Three pure stages:
//! 1. [`normalize_l1`]: divide by the sum of absolute values.
//! 2. [`limits::apply_limits`]: clamp negatives, enforce the ledger's minimum
//!    entry count, keep the largest entries, cap any single weight.
//! 3. [`quantize`]: scale by the maximum to u16, drop entries that round to 0.
//!
//! Identical input always yields an identical submission, so resubmitting an
//! unchanged score vector is a ledger no-op.

pub mod limits;
pub mod normalize;
pub mod quantize;

use std::sync::Arc;

use tracing::debug;

use vigil_core::errors::VigilResult;
use vigil_core::models::{RunEvent, WeightLimits, WeightSubmission};
use vigil_core::traits::IRunObserver;

pub use limits::apply_limits;
pub use normalize::normalize_l1;
pub use quantize::quantize;

/// Turns a score vector into a `WeightSubmission`.
pub struct WeightEncoder {
    version_key: u64,
    observer: Arc<dyn IRunObserver>,
}

impl WeightEncoder {
    /// Encoder stamping every submission with `version_key`.
    pub fn new(version_key: u64, observer: Arc<dyn IRunObserver>) -> Self {
        Self {
            version_key,
            observer,
        }
    }

    pub fn version_key(&self) -> u64 {
        self.version_key
    }

    /// Encode `scores` for submission at `height`.
    ///
    /// An empty submission means there is nothing worth sending.
    pub fn encode(
        &self,
        scores: &[f64],
        limits: &WeightLimits,
        height: u64,
    ) -> VigilResult<WeightSubmission> {
        let non_finite: Vec<usize> = scores
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_finite())
            .map(|(ordinal, _)| ordinal)
            .collect();
        if !non_finite.is_empty() {
            self.observer.observe(&RunEvent::NanRewards {
                ordinals: non_finite,
            });
        }

        let normalized = normalize_l1(scores);
        let processed = apply_limits(&normalized, limits);
        let (ordinals, weights) = quantize(&processed);
        debug!(
            height,
            entries = ordinals.len(),
            "encoded weight submission"
        );
        WeightSubmission::new(ordinals, weights, height, self.version_key)
    }
}
