use std::time::Duration;

use async_trait::async_trait;

use crate::models::{PeerRecord, QueryFailure, Request, Response};

/// Sends one request to one peer. The callee guarantees bounded latency
/// around `timeout`; the dispatcher enforces it regardless.
#[async_trait]
pub trait IPeerTransport: Send + Sync {
    async fn query(
        &self,
        peer: &PeerRecord,
        request: &Request,
        timeout: Duration,
    ) -> Result<Response, QueryFailure>;
}
