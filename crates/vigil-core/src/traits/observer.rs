use crate::models::RunEvent;

/// Receives diagnostics from the components it is injected into.
pub trait IRunObserver: Send + Sync {
    fn observe(&self, event: &RunEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl IRunObserver for NoopObserver {
    fn observe(&self, _event: &RunEvent) {}
}
