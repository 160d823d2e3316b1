use std::sync::atomic::{AtomicUsize, Ordering};

use vigil_core::traits::IServedEndpoint;

/// Endpoint double counting `stop()` calls.
#[derive(Debug, Default)]
pub struct MockEndpoint {
    stops: AtomicUsize,
}

impl MockEndpoint {
    /// Endpoint that has not been stopped.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `stop` was called.
    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    /// Whether `stop` was called at least once.
    pub fn is_stopped(&self) -> bool {
        self.stop_count() > 0
    }
}

impl IServedEndpoint for MockEndpoint {
    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }

    fn describe(&self) -> String {
        "mock-endpoint".to_string()
    }
}
