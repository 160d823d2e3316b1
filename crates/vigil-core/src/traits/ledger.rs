use async_trait::async_trait;

use crate::errors::LedgerError;
use crate::models::{
    Identity, RosterQuery, RosterSnapshot, SubmitOutcome, WeightLimits, WeightSubmission,
};

/// Read side of the shared ledger.
#[async_trait]
pub trait ILedgerReader: Send + Sync {
    /// Current ledger height.
    async fn height(&self) -> Result<u64, LedgerError>;

    /// Roster at a height. A single snapshot never mixes two heights.
    async fn roster(&self, query: RosterQuery) -> Result<RosterSnapshot, LedgerError>;

    async fn is_registered(&self, identity: &Identity) -> Result<bool, LedgerError>;

    /// Bounds the ledger enforces on weight submissions.
    async fn weight_limits(&self) -> Result<WeightLimits, LedgerError>;
}

/// Write side of the shared ledger. Resubmitting an unchanged vector is a no-op.
#[async_trait]
pub trait ILedgerWriter: Send + Sync {
    async fn submit_weights(
        &self,
        submission: WeightSubmission,
    ) -> Result<SubmitOutcome, LedgerError>;
}
