//! StateStore: `IStateStore` backed by one SQLite file.

use std::path::Path;

use tracing::{debug, info};

use vigil_core::config::StorageConfig;
use vigil_core::errors::{StorageError, VigilError, VigilResult};
use vigil_core::models::PersistedState;
use vigil_core::traits::IStateStore;

use crate::migrations;
use crate::pool::{pragmas, StateConnection};
use crate::queries::state_ops;
use crate::to_storage_err;

pub struct StateStore {
    conn: StateConnection,
}

impl StateStore {
    /// Open (or create) the database at `path` and bring its schema up to date.
    pub fn open(path: &Path) -> VigilResult<Self> {
        Self::open_with_timeout(path, vigil_core::config::defaults::DEFAULT_BUSY_TIMEOUT_MS)
    }

    /// Open the store at `config.db_path` with its busy timeout.
    pub fn from_config(config: &StorageConfig) -> VigilResult<Self> {
        Self::open_with_timeout(Path::new(&config.db_path), config.busy_timeout_ms)
    }

    fn open_with_timeout(path: &Path, busy_timeout_ms: u32) -> VigilResult<Self> {
        let conn = StateConnection::open(path, busy_timeout_ms)?;
        conn.with_conn(migrations::run_migrations)?;
        info!(path = %path.display(), "state store opened");
        Ok(Self { conn })
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> VigilResult<Self> {
        let conn = StateConnection::open_in_memory()?;
        conn.with_conn(migrations::run_migrations)?;
        Ok(Self { conn })
    }

    /// Latest migration applied to this database.
    pub fn schema_version(&self) -> VigilResult<u32> {
        self.conn.with_conn(|conn| migrations::current_version(conn))
    }

    /// Whether the connection runs in WAL journal mode.
    pub fn is_wal(&self) -> VigilResult<bool> {
        self.conn.with_conn(|conn| pragmas::verify_wal_mode(conn))
    }

    /// RFC 3339 timestamp of the last successful save.
    pub fn last_saved_at(&self) -> VigilResult<Option<String>> {
        self.conn.with_conn(|conn| state_ops::saved_at(conn))
    }

    /// Forget the persisted state.
    pub fn clear(&self) -> VigilResult<()> {
        self.conn.with_conn(|conn| state_ops::delete_state(conn))
    }

    /// Run SQLite's integrity check. `Ok(false)` means the file is damaged.
    pub fn check_integrity(&self) -> VigilResult<bool> {
        self.conn.with_conn(|conn| {
            let result: String = conn
                .pragma_query_value(None, "integrity_check", |row| row.get(0))
                .map_err(to_storage_err)?;
            Ok(result == "ok")
        })
    }
}

impl IStateStore for StateStore {
    fn save(&self, state: &PersistedState) -> VigilResult<()> {
        if !state.is_consistent() {
            return Err(StorageError::CorruptState {
                details: format!(
                    "refusing to save {} scores for {} identities",
                    state.scores.len(),
                    state.identities.len()
                ),
            }
            .into());
        }
        if state.scores.iter().any(|s| !s.is_finite()) {
            return Err(VigilError::ValidationError(
                "refusing to save non-finite scores".to_string(),
            ));
        }

        self.conn.with_conn(|conn| {
            let tx = conn.transaction().map_err(to_storage_err)?;
            state_ops::replace_state(&tx, state)?;
            tx.commit().map_err(to_storage_err)?;
            Ok(())
        })?;
        debug!(step = state.step, peers = state.scores.len(), "state saved");
        Ok(())
    }

    fn load(&self) -> VigilResult<Option<PersistedState>> {
        self.conn.with_conn(|conn| state_ops::get_state(conn))
    }
}
