use serde::{Deserialize, Serialize};

use super::{Identity, IdentityTable, PeerRecord};

/// Which ledger height to read the roster at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterQuery {
    Latest,
    At(u64),
}

/// Immutable view of the peer set at one ledger height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    height: u64,
    peers: Vec<PeerRecord>,
}

impl RosterSnapshot {
    /// Build a snapshot, re-deriving every ordinal from position.
    pub fn new(height: u64, peers: Vec<PeerRecord>) -> Self {
        let peers = peers
            .into_iter()
            .enumerate()
            .map(|(ordinal, peer)| PeerRecord { ordinal, ..peer })
            .collect();
        Self { height, peers }
    }

    /// Ledger height the snapshot was read at.
    pub fn height(&self) -> u64 {
        self.height
    }

    /// Number of peers, serving or not.
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Peers in ordinal order.
    pub fn peers(&self) -> &[PeerRecord] {
        &self.peers
    }

    /// Peer at `ordinal`, if in range.
    pub fn get(&self, ordinal: usize) -> Option<&PeerRecord> {
        self.peers.get(ordinal)
    }

    /// Ordinal of `identity` in this snapshot, if present.
    pub fn ordinal_of(&self, identity: &Identity) -> Option<usize> {
        self.peers.iter().position(|p| &p.identity == identity)
    }

    pub fn contains(&self, identity: &Identity) -> bool {
        self.ordinal_of(identity).is_some()
    }

    /// Ordinal → identity binding for this snapshot.
    pub fn identity_table(&self) -> IdentityTable {
        self.peers.iter().map(|p| p.identity.clone()).collect()
    }
}
