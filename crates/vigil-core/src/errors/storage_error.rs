/// Persistence-layer errors for SQLite operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("persisted state is corrupt: {details}")]
    CorruptState { details: String },

    #[error("database busy: {message}")]
    Busy { message: String },
}

impl StorageError {
    /// Busy/locked databases clear up on their own; everything else does not.
    pub fn is_transient(&self) -> bool {
        matches!(self, StorageError::Busy { .. })
    }
}
