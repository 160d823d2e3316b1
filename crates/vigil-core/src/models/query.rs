use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::PeerRecord;

/// One logical request sent to every peer of a fan-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub step: u64,
    pub payload: serde_json::Value,
}

/// A peer's answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub payload: serde_json::Value,
    pub latency: Duration,
}

/// Why a peer produced no response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryFailure {
    #[error("timed out after {}ms", after.as_millis())]
    Timeout { after: Duration },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    /// The fan-out deadline passed while the call was still waiting for an
    /// in-flight permit. The peer was never contacted.
    #[error("not dispatched before the fan-out deadline")]
    NotDispatched,

    /// The call was issued but the fan-out deadline cut it off before the
    /// peer's own timeout ran out.
    #[error("cut off by the fan-out deadline after {}ms", after.as_millis())]
    Abandoned { after: Duration },
}

impl QueryFailure {
    /// Whether the failure says something about the peer itself. Calls
    /// starved by the dispatcher's own limits are not held against a peer.
    pub fn is_peer_fault(&self) -> bool {
        !matches!(self, Self::NotDispatched | Self::Abandoned { .. })
    }
}

/// Resolution of one peer in a fan-out.
#[derive(Debug, Clone)]
pub struct PeerOutcome {
    pub peer: PeerRecord,
    pub result: Result<Response, QueryFailure>,
}

impl PeerOutcome {
    /// Whether the peer answered.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}
