use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use vigil_core::errors::LedgerError;
use vigil_core::models::{
    Identity, PeerRecord, RosterQuery, RosterSnapshot, SubmitOutcome, WeightLimits,
    WeightSubmission,
};
use vigil_core::traits::{ILedgerReader, ILedgerWriter};

#[derive(Debug)]
struct LedgerState {
    height: u64,
    peers: Vec<PeerRecord>,
    limits: WeightLimits,
    submissions: Vec<WeightSubmission>,
    auto_advance: u64,
    fail_reads: bool,
    fail_roster: bool,
    reject_with: Option<String>,
    write_delay: Duration,
}

/// In-memory ledger. Only the current roster is kept; any height at or below
/// the current one returns it.
#[derive(Debug)]
pub struct MockLedger {
    state: Mutex<LedgerState>,
}

impl MockLedger {
    /// Ledger at height 0 listing `peers`, accepting every submission.
    pub fn new(peers: Vec<PeerRecord>) -> Self {
        Self {
            state: Mutex::new(LedgerState {
                height: 0,
                peers,
                limits: WeightLimits::default(),
                submissions: Vec::new(),
                auto_advance: 0,
                fail_reads: false,
                fail_roster: false,
                reject_with: None,
                write_delay: Duration::ZERO,
            }),
        }
    }

    /// Start at `height` instead of 0.
    pub fn with_height(self, height: u64) -> Self {
        self.state.lock().height = height;
        self
    }

    /// Every `height()` call first advances the chain by `blocks`.
    pub fn with_auto_advance(self, blocks: u64) -> Self {
        self.state.lock().auto_advance = blocks;
        self
    }

    /// Height without auto-advance.
    pub fn current_height(&self) -> u64 {
        self.state.lock().height
    }

    /// Move the height forward by `blocks`.
    pub fn advance(&self, blocks: u64) {
        self.state.lock().height += blocks;
    }

    /// Replace the roster served from now on.
    pub fn set_peers(&self, peers: Vec<PeerRecord>) {
        self.state.lock().peers = peers;
    }

    /// Replace the weight limits served from now on.
    pub fn set_limits(&self, limits: WeightLimits) {
        self.state.lock().limits = limits;
    }

    /// Make every read fail with `Unavailable`.
    pub fn set_read_failure(&self, fail: bool) {
        self.state.lock().fail_reads = fail;
    }

    /// Make only roster reads fail.
    pub fn set_roster_failure(&self, fail: bool) {
        self.state.lock().fail_roster = fail;
    }

    /// Reject every submission with `message`, or accept again with `None`.
    pub fn set_rejection(&self, message: Option<&str>) {
        self.state.lock().reject_with = message.map(str::to_string);
    }

    /// Hold every write for `delay` before answering.
    pub fn set_write_delay(&self, delay: Duration) {
        self.state.lock().write_delay = delay;
    }

    /// Every accepted submission, oldest first.
    pub fn submissions(&self) -> Vec<WeightSubmission> {
        self.state.lock().submissions.clone()
    }

    fn unavailable() -> LedgerError {
        LedgerError::Unavailable {
            reason: "mock ledger read failure".to_string(),
        }
    }
}

#[async_trait]
impl ILedgerReader for MockLedger {
    async fn height(&self) -> Result<u64, LedgerError> {
        let mut state = self.state.lock();
        if state.fail_reads {
            return Err(Self::unavailable());
        }
        state.height += state.auto_advance;
        Ok(state.height)
    }

    async fn roster(&self, query: RosterQuery) -> Result<RosterSnapshot, LedgerError> {
        let state = self.state.lock();
        if state.fail_reads || state.fail_roster {
            return Err(Self::unavailable());
        }
        let height = match query {
            RosterQuery::Latest => state.height,
            RosterQuery::At(h) if h <= state.height => h,
            RosterQuery::At(h) => return Err(LedgerError::HeightNotFound { height: h }),
        };
        Ok(RosterSnapshot::new(height, state.peers.clone()))
    }

    async fn is_registered(&self, identity: &Identity) -> Result<bool, LedgerError> {
        let state = self.state.lock();
        if state.fail_reads {
            return Err(Self::unavailable());
        }
        Ok(state.peers.iter().any(|p| &p.identity == identity))
    }

    async fn weight_limits(&self) -> Result<WeightLimits, LedgerError> {
        let state = self.state.lock();
        if state.fail_reads {
            return Err(Self::unavailable());
        }
        Ok(state.limits)
    }
}

#[async_trait]
impl ILedgerWriter for MockLedger {
    async fn submit_weights(
        &self,
        submission: WeightSubmission,
    ) -> Result<SubmitOutcome, LedgerError> {
        let delay = self.state.lock().write_delay;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock();
        if let Some(message) = &state.reject_with {
            return Ok(SubmitOutcome::rejected(message.clone()));
        }
        let unchanged = state.submissions.last().is_some_and(|last| {
            last.ordinals() == submission.ordinals() && last.weights() == submission.weights()
        });
        state.submissions.push(submission);
        if unchanged {
            Ok(SubmitOutcome {
                success: true,
                message: "weights unchanged".to_string(),
            })
        } else {
            Ok(SubmitOutcome::accepted())
        }
    }
}
