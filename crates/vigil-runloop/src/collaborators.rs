//! The external pieces a controller orchestrates.

use std::sync::Arc;

use vigil_core::traits::{
    ILedgerReader, ILedgerWriter, IPeerTransport, IRewardFunction, IRunObserver, IServedEndpoint,
    IStateStore,
};
use vigil_observability::TracingObserver;

/// Trait objects injected into a `RunLoopController`.
///
/// Persistence and the served endpoint are optional. Diagnostics go to
/// `TracingObserver` unless another observer is supplied.
#[derive(Clone)]
pub struct Collaborators {
    pub reader: Arc<dyn ILedgerReader>,
    pub writer: Arc<dyn ILedgerWriter>,
    pub transport: Arc<dyn IPeerTransport>,
    pub reward: Arc<dyn IRewardFunction>,
    pub store: Option<Arc<dyn IStateStore>>,
    pub endpoint: Option<Arc<dyn IServedEndpoint>>,
    pub observer: Arc<dyn IRunObserver>,
}

impl Collaborators {
    /// Required collaborators only: no store, no endpoint, tracing observer.
    pub fn new(
        reader: Arc<dyn ILedgerReader>,
        writer: Arc<dyn ILedgerWriter>,
        transport: Arc<dyn IPeerTransport>,
        reward: Arc<dyn IRewardFunction>,
    ) -> Self {
        Self {
            reader,
            writer,
            transport,
            reward,
            store: None,
            endpoint: None,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Persist scores through `store`.
    pub fn with_store(mut self, store: Arc<dyn IStateStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Stop `endpoint` when the run is interrupted.
    pub fn with_endpoint(mut self, endpoint: Arc<dyn IServedEndpoint>) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Send run events to `observer` instead of `tracing`.
    pub fn with_observer(mut self, observer: Arc<dyn IRunObserver>) -> Self {
        self.observer = observer;
        self
    }
}
