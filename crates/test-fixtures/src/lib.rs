//! Shared test doubles for the Vigil workspace.
//!
//! - [`MockLedger`]: in-memory ledger with a controllable height and roster
//! - [`MockTransport`]: per-peer scripted responses, delays, and failures
//! - [`EchoReward`] / [`PayloadReward`]: reward functions
//! - [`MockEndpoint`]: records whether it was stopped

mod endpoint;
mod ledger;
mod reward;
mod transport;

pub use endpoint::MockEndpoint;
pub use ledger::MockLedger;
pub use reward::{EchoReward, PayloadReward};
pub use transport::{MockTransport, PeerBehavior};

use vigil_core::models::{PeerRecord, RosterSnapshot};

/// Serving peers with the given identities, addresses derived from position.
pub fn peers_of(ids: &[&str]) -> Vec<PeerRecord> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| PeerRecord::new(*id, format!("127.0.0.1:{}", 9000 + i)))
        .collect()
}

/// Snapshot of serving peers with the given identities.
pub fn roster_of(height: u64, ids: &[&str]) -> RosterSnapshot {
    RosterSnapshot::new(height, peers_of(ids))
}

/// Snapshot of `n` serving peers named `peer-0..peer-{n-1}`.
pub fn roster_of_size(height: u64, n: usize) -> RosterSnapshot {
    let ids: Vec<String> = (0..n).map(|i| format!("peer-{i}")).collect();
    let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    roster_of(height, &refs)
}
