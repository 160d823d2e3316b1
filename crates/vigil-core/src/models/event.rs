use serde::{Deserialize, Serialize};

use super::Identity;

/// Why a reward entry never reached the EMA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Ordinal is past the end of the score vector.
    OutOfRange { len: usize },
    /// The ordinal was rebound to another identity since the peer was queried.
    IdentityMismatch { expected: Identity, found: Identity },
}

/// Periodic status summary emitted once per epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusLine {
    pub step: u64,
    pub height: u64,
    pub roster_size: usize,
    /// Highest-scoring identities, descending.
    pub top_scores: Vec<(Identity, f64)>,
}

/// Diagnostics emitted by the core through an injected observer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunEvent {
    Started { step: u64, height: u64 },
    Stopped { step: u64 },
    NanRewards { ordinals: Vec<usize> },
    RewardSkipped { ordinal: usize, reason: SkipReason },
    ScoresReset { ordinals: Vec<usize> },
    RosterRefreshFailed { error: String },
    PeerQueryFailed { ordinal: usize, identity: Identity, error: String },
    WeightsSubmitted { height: u64, entries: usize, success: bool, message: String },
    WeightsSubmitFailed { error: String },
    StateSaved { step: u64 },
    StateSaveFailed { error: String },
    EpochFailed { step: u64, error: String },
    Status(StatusLine),
}
