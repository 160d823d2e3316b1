use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use vigil_core::models::{Identity, PeerRecord, QueryFailure, Request, Response};
use vigil_core::traits::IPeerTransport;

/// How a scripted peer answers.
#[derive(Debug, Clone)]
pub enum PeerBehavior {
    /// Answer with twice the numeric request payload after `delay`.
    Echo { delay: Duration },
    /// Answer with a fixed payload after `delay`.
    Respond { payload: Value, delay: Duration },
    /// Never answer.
    Silent,
    /// Fail immediately.
    Fail(String),
}

impl Default for PeerBehavior {
    fn default() -> Self {
        PeerBehavior::Echo {
            delay: Duration::ZERO,
        }
    }
}

/// Transport double. Peers without a script echo immediately.
#[derive(Debug, Default)]
pub struct MockTransport {
    behaviors: Mutex<HashMap<Identity, PeerBehavior>>,
    calls: Mutex<HashMap<Identity, usize>>,
}

impl MockTransport {
    /// Transport where every unscripted peer echoes immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how `identity` answers from now on.
    pub fn script(&self, identity: &str, behavior: PeerBehavior) {
        self.behaviors.lock().insert(Identity::from(identity), behavior);
    }

    /// Answer with `reward` as payload, for use with `PayloadReward`.
    pub fn respond_with(&self, identity: &str, reward: f64) {
        self.script(
            identity,
            PeerBehavior::Respond {
                payload: serde_json::json!(reward),
                delay: Duration::ZERO,
            },
        );
    }

    /// Queries issued to `identity` so far.
    pub fn calls_to(&self, identity: &str) -> usize {
        self.calls
            .lock()
            .get(&Identity::from(identity))
            .copied()
            .unwrap_or(0)
    }

    /// Queries issued to any peer so far.
    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }
}

#[async_trait]
impl IPeerTransport for MockTransport {
    async fn query(
        &self,
        peer: &PeerRecord,
        request: &Request,
        _timeout: Duration,
    ) -> Result<Response, QueryFailure> {
        *self.calls.lock().entry(peer.identity.clone()).or_insert(0) += 1;
        let behavior = self
            .behaviors
            .lock()
            .get(&peer.identity)
            .cloned()
            .unwrap_or_default();

        match behavior {
            PeerBehavior::Echo { delay } => {
                tokio::time::sleep(delay).await;
                let payload = request
                    .payload
                    .as_u64()
                    .map(|v| serde_json::json!(v * 2))
                    .unwrap_or(Value::Null);
                Ok(Response {
                    payload,
                    latency: delay,
                })
            }
            PeerBehavior::Respond { payload, delay } => {
                tokio::time::sleep(delay).await;
                Ok(Response {
                    payload,
                    latency: delay,
                })
            }
            PeerBehavior::Silent => std::future::pending().await,
            PeerBehavior::Fail(message) => Err(QueryFailure::Transport(message)),
        }
    }
}
