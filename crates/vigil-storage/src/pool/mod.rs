//! The single connection every save and load goes through.

pub mod pragmas;

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use vigil_core::errors::{StorageError, VigilResult};

use crate::to_storage_err;

/// One SQLite connection behind a mutex. Saves are rare (once per epoch),
/// so there is no read pool.
pub struct StateConnection {
    conn: Mutex<Connection>,
}

impl StateConnection {
    /// Open or create the database at `path` and apply pragmas.
    pub fn open(path: &Path, busy_timeout_ms: u32) -> VigilResult<Self> {
        let conn = Connection::open(path).map_err(to_storage_err)?;
        pragmas::apply_pragmas(&conn, busy_timeout_ms)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory database (for testing).
    pub fn open_in_memory() -> VigilResult<Self> {
        let conn = Connection::open_in_memory().map_err(to_storage_err)?;
        pragmas::apply_pragmas(&conn, 0)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `f` with exclusive access to the connection.
    pub fn with_conn<F, T>(&self, f: F) -> VigilResult<T>
    where
        F: FnOnce(&mut Connection) -> VigilResult<T>,
    {
        let mut guard = self.conn.lock().map_err(|e| StorageError::SqliteError {
            message: format!("state connection lock poisoned: {e}"),
        })?;
        f(&mut guard)
    }
}
