use serde::{Deserialize, Serialize};

use super::Identity;

/// One peer as seen in a single roster snapshot.
///
/// Recreated wholesale on every refresh. `ordinal` is only meaningful
/// relative to the snapshot that produced the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerRecord {
    pub identity: Identity,
    pub ordinal: usize,
    /// Network address the transport dials. Opaque to the core.
    pub address: String,
    pub serving: bool,
    pub stake: f64,
    pub validator_permit: bool,
}

impl PeerRecord {
    /// Serving, permit-less peer with zero stake at ordinal 0. The
    /// ordinal is assigned when the record joins a `RosterSnapshot`.
    pub fn new(identity: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            identity: Identity::new(identity),
            ordinal: 0,
            address: address.into(),
            serving: true,
            stake: 0.0,
            validator_permit: false,
        }
    }

    pub fn with_stake(mut self, stake: f64) -> Self {
        self.stake = stake;
        self
    }

    pub fn with_permit(mut self, permit: bool) -> Self {
        self.validator_permit = permit;
        self
    }

    pub fn with_serving(mut self, serving: bool) -> Self {
        self.serving = serving;
        self
    }
}
