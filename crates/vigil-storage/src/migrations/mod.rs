//! Versioned schema migrations, applied in order inside a transaction each.

mod v001_validator_state;

use rusqlite::{params, Connection};
use tracing::info;

use vigil_core::errors::{StorageError, VigilResult};

use crate::to_storage_err;

type Migration = fn(&Connection) -> VigilResult<()>;

const MIGRATIONS: &[(u32, Migration)] = &[(1, v001_validator_state::migrate)];

/// Latest schema version this build knows about.
pub const LATEST_VERSION: u32 = 1;

/// Apply every migration newer than the recorded version, each in
/// its own transaction.
pub fn run_migrations(conn: &mut Connection) -> VigilResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        );",
    )
    .map_err(to_storage_err)?;

    let current = current_version(conn)?;
    for &(version, migrate) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
        let tx = conn.transaction().map_err(to_storage_err)?;
        migrate(&tx).map_err(|e| StorageError::MigrationFailed {
            version,
            reason: e.to_string(),
        })?;
        tx.execute(
            "INSERT INTO schema_version (version, applied_at) VALUES (?1, ?2)",
            params![version, chrono::Utc::now().to_rfc3339()],
        )
        .map_err(to_storage_err)?;
        tx.commit().map_err(to_storage_err)?;
        info!(version, "applied state migration");
    }
    Ok(())
}

/// Highest applied migration, or 0 on a fresh database.
pub fn current_version(conn: &Connection) -> VigilResult<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(to_storage_err)
}
