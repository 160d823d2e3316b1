use super::{
    ConfigError, DispatchError, LedgerError, LifecycleError, RegistrationError, StorageError,
};

/// Convenience alias used throughout the workspace.
pub type VigilResult<T> = Result<T, VigilError>;

/// Top-level error for every Vigil subsystem.
#[derive(Debug, thiserror::Error)]
pub enum VigilError {
    #[error("ledger error: {0}")]
    LedgerError(#[from] LedgerError),

    #[error("dispatch error: {0}")]
    DispatchError(#[from] DispatchError),

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("config error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("registration error: {0}")]
    RegistrationError(#[from] RegistrationError),

    #[error("lifecycle error: {0}")]
    LifecycleError(#[from] LifecycleError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("validation error: {0}")]
    ValidationError(String),
}

impl VigilError {
    /// Whether the error means no meaningful epoch can run.
    ///
    /// Configuration and registration failures are fatal. Everything else is
    /// logged and retried on the next epoch.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            VigilError::ConfigError(_) | VigilError::RegistrationError(_)
        )
    }

    /// Whether the error came from a collaborator that may recover by itself.
    pub fn is_transient(&self) -> bool {
        match self {
            VigilError::LedgerError(_) | VigilError::DispatchError(_) => true,
            VigilError::StorageError(e) => e.is_transient(),
            _ => false,
        }
    }
}
