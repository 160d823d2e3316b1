//! RequestDispatcher: one request to many peers, all resolved by a deadline.
//!
//! Every peer call is wrapped in its own timeout, started when the call is
//! issued, and the whole fan-out in a shared deadline of `timeout + slack`.
//! The in-flight permits are shared by every fan-out running on the same
//! dispatcher. A peer still waiting for a permit when the deadline passes is
//! reported as `NotDispatched`; a call issued late and cut by the deadline
//! before its own timeout is reported as `Abandoned`. Only a call that ran
//! out its own timeout is a `Timeout`. Peer failures are isolated: each
//! future resolves to its own `PeerOutcome` and nothing is cancelled on a
//! sibling's error.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, instrument};

use vigil_core::config::DispatchConfig;
use vigil_core::models::{PeerOutcome, PeerRecord, QueryFailure, Request, Response};
use vigil_core::traits::IPeerTransport;

/// Bounded-concurrency fan-out over an injected transport.
pub struct RequestDispatcher {
    transport: Arc<dyn IPeerTransport>,
    permits: Arc<Semaphore>,
    timeout: Duration,
    slack: Duration,
}

impl RequestDispatcher {
    /// Build a dispatcher whose permit pool holds `max_in_flight` slots.
    pub fn new(transport: Arc<dyn IPeerTransport>, config: &DispatchConfig) -> Self {
        Self {
            transport,
            permits: Arc::new(Semaphore::new(config.max_in_flight.max(1))),
            timeout: config.query_timeout(),
            slack: config.timeout_slack(),
        }
    }

    /// Per-peer timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Latest time a fan-out can take.
    pub fn worst_case(&self) -> Duration {
        self.timeout + self.slack
    }

    /// Query every peer concurrently. Returns one outcome per peer, in input
    /// order, once all have resolved or the deadline has passed.
    #[instrument(skip(self, peers, request), fields(peers = peers.len(), step = request.step))]
    pub async fn fan_out(&self, peers: &[PeerRecord], request: &Request) -> Vec<PeerOutcome> {
        let deadline = Instant::now() + self.worst_case();
        let calls = peers.iter().map(|peer| async move {
            PeerOutcome {
                peer: peer.clone(),
                result: self.call(peer, request, deadline).await,
            }
        });

        let outcomes = join_all(calls).await;
        let ok = outcomes.iter().filter(|o| o.is_success()).count();
        let not_queried = outcomes
            .iter()
            .filter(|o| matches!(&o.result, Err(f) if !f.is_peer_fault()))
            .count();
        debug!(
            ok,
            failed = outcomes.len() - ok - not_queried,
            not_queried,
            "fan-out complete"
        );
        outcomes
    }

    /// Wait for a permit, then query the peer. Resolves no later than
    /// `deadline`.
    async fn call(
        &self,
        peer: &PeerRecord,
        request: &Request,
        deadline: Instant,
    ) -> Result<Response, QueryFailure> {
        let _permit = match timeout_at(deadline, self.permits.acquire()).await {
            Ok(Ok(permit)) => permit,
            Ok(Err(_)) => {
                return Err(QueryFailure::Transport(
                    "dispatch permit pool closed".to_string(),
                ))
            }
            Err(_) => return Err(QueryFailure::NotDispatched),
        };

        let issued = Instant::now();
        let expires = issued + self.timeout;
        let cutoff = expires.min(deadline);
        let query = self.transport.query(peer, request, self.timeout);
        match timeout_at(cutoff, query).await {
            Ok(result) => result,
            Err(_) if cutoff == expires => Err(QueryFailure::Timeout {
                after: self.timeout,
            }),
            Err(_) => Err(QueryFailure::Abandoned {
                after: issued.elapsed(),
            }),
        }
    }
}
