/// Errors raised by ledger read/write collaborators.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("ledger {operation} timed out after {after_ms}ms")]
    Timeout { operation: String, after_ms: u64 },

    #[error("no roster recorded at height {height}")]
    HeightNotFound { height: u64 },

    #[error("inconsistent roster at height {height}: {details}")]
    InconsistentRoster { height: u64, details: String },

    #[error("submission rejected: {message}")]
    Rejected { message: String },
}
