/// Errors from the run loop's start/stop state machine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LifecycleError {
    #[error("run loop already running (state: {state})")]
    AlreadyRunning { state: String },

    #[error("run loop is not running")]
    NotRunning,

    #[error("failed to spawn background context: {reason}")]
    SpawnFailed { reason: String },

    #[error("background context did not exit within {after_ms}ms; abandoned")]
    JoinTimedOut { after_ms: u64 },

    #[error("a previously abandoned run loop thread is still alive")]
    PreviousRunAlive,
}
