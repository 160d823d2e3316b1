//! Cooperative cancellation token.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Flags {
    cancelled: AtomicBool,
    abandoned: AtomicBool,
}

/// Shared stop flag checked by the loop between epochs and while waiting
/// for the next one. A fresh token is issued for every run.
///
/// An abandoned token also tells the loop that its controller has given up
/// on it: the loop must no longer touch shared state.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flags: Arc<Flags>,
}

impl CancellationToken {
    /// Create a new cancellation token in the running state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a stop has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flags.cancelled.load(Ordering::Acquire)
    }

    /// Ask the loop to finish its current epoch and exit.
    pub fn cancel(&self) {
        self.flags.cancelled.store(true, Ordering::Release);
    }

    /// Cancel and disown the loop. Its remaining work is discarded.
    pub fn abandon(&self) {
        self.flags.abandoned.store(true, Ordering::Release);
        self.cancel();
    }

    /// Whether the controller has disowned the loop holding this token.
    pub fn is_abandoned(&self) -> bool {
        self.flags.abandoned.load(Ordering::Acquire)
    }
}

/// Lets another thread ask a running loop to wind down. Bound to the run
/// it was taken from.
#[derive(Debug, Clone)]
pub struct StopHandle {
    token: CancellationToken,
}

impl StopHandle {
    pub(crate) fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    /// Request a stop; the controller's `run_until_interrupted` notices and
    /// joins the loop.
    pub fn request_stop(&self) {
        self.token.cancel();
    }

    /// Whether a stop has been requested for this run.
    pub fn is_stop_requested(&self) -> bool {
        self.token.is_cancelled()
    }
}
