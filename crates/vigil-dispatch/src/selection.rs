//! Uniform peer sampling over the currently available peers.

use rand::seq::SliceRandom;
use rand::Rng;

use vigil_core::config::DispatchConfig;
use vigil_core::models::{Identity, PeerRecord, RosterSnapshot};

/// Picks the peers queried by one forward pass.
#[derive(Debug, Clone)]
pub struct PeerSelector {
    sample_size: usize,
    vpermit_stake_limit: f64,
    exclude: Option<Identity>,
}

impl PeerSelector {
    /// Selector sampling `sample_size` peers under `vpermit_stake_limit`.
    pub fn new(config: &DispatchConfig) -> Self {
        Self {
            sample_size: config.sample_size,
            vpermit_stake_limit: config.vpermit_stake_limit,
            exclude: None,
        }
    }

    /// Never select `identity` (the validator itself).
    pub fn excluding(mut self, identity: Identity) -> Self {
        self.exclude = Some(identity);
        self
    }

    /// A peer is available when it is serving, is not excluded, and is not a
    /// permitted validator staking above the limit.
    pub fn is_available(&self, peer: &PeerRecord) -> bool {
        if !peer.serving {
            return false;
        }
        if self.exclude.as_ref() == Some(&peer.identity) {
            return false;
        }
        !(peer.validator_permit && peer.stake > self.vpermit_stake_limit)
    }

    /// Up to `sample_size` distinct available peers, uniformly at random.
    /// Returns every available peer when fewer exist.
    pub fn select<R: Rng + ?Sized>(&self, snapshot: &RosterSnapshot, rng: &mut R) -> Vec<PeerRecord> {
        let available: Vec<&PeerRecord> = snapshot
            .peers()
            .iter()
            .filter(|p| self.is_available(p))
            .collect();
        available
            .choose_multiple(rng, self.sample_size)
            .map(|p| (*p).clone())
            .collect()
    }
}
