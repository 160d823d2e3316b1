//! # vigil-storage
//!
//! Durable snapshot/restore of tracker state on SQLite.
//!
//! The whole `PersistedState` lives in one row that is replaced inside a
//! single transaction, so a crash mid-save leaves the previous row intact.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StateStore;

use vigil_core::errors::{StorageError, VigilError};

/// Map a rusqlite failure to the storage error taxonomy.
pub(crate) fn to_storage_err(err: rusqlite::Error) -> VigilError {
    let busy = matches!(
        err.sqlite_error_code(),
        Some(rusqlite::ErrorCode::DatabaseBusy) | Some(rusqlite::ErrorCode::DatabaseLocked)
    );
    if busy {
        StorageError::Busy {
            message: err.to_string(),
        }
        .into()
    } else {
        StorageError::SqliteError {
            message: err.to_string(),
        }
        .into()
    }
}
