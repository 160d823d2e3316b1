use serde::{Deserialize, Serialize};

use crate::errors::{VigilError, VigilResult};

/// Ledger-defined bounds on a weight submission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightLimits {
    /// Fewer non-zero weights than this are replaced by a uniform vector.
    pub min_allowed_weights: usize,
    /// Largest normalized weight a single entry may carry, in (0, 1].
    pub max_weight_limit: f64,
    /// Maximum number of entries in one submission.
    pub max_weights: usize,
}

impl Default for WeightLimits {
    fn default() -> Self {
        Self {
            min_allowed_weights: 1,
            max_weight_limit: 1.0,
            max_weights: u16::MAX as usize,
        }
    }
}

/// Quantized weights ready for the ledger. Immutable once built and consumed
/// by value by the ledger writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightSubmission {
    ordinals: Vec<usize>,
    weights: Vec<u16>,
    height: u64,
    version_key: u64,
}

impl WeightSubmission {
    /// Pair ordinals with weights. Fails when the two lengths differ.
    pub fn new(
        ordinals: Vec<usize>,
        weights: Vec<u16>,
        height: u64,
        version_key: u64,
    ) -> VigilResult<Self> {
        if ordinals.len() != weights.len() {
            return Err(VigilError::ValidationError(format!(
                "submission has {} ordinals but {} weights",
                ordinals.len(),
                weights.len()
            )));
        }
        Ok(Self {
            ordinals,
            weights,
            height,
            version_key,
        })
    }

    pub fn ordinals(&self) -> &[usize] {
        &self.ordinals
    }

    /// Quantized weights, parallel to `ordinals`.
    pub fn weights(&self) -> &[u16] {
        &self.weights
    }

    /// Ledger height the weights were computed at.
    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn version_key(&self) -> u64 {
        self.version_key
    }

    /// Number of (ordinal, weight) entries.
    pub fn len(&self) -> usize {
        self.ordinals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordinals.is_empty()
    }
}

/// What the ledger said about a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    pub success: bool,
    pub message: String,
}

impl SubmitOutcome {
    /// The ledger took the submission.
    pub fn accepted() -> Self {
        Self {
            success: true,
            message: String::new(),
        }
    }

    /// The ledger refused the submission with `message`.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
