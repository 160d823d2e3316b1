//! v001: single-row validator state table.

use rusqlite::Connection;

use vigil_core::errors::VigilResult;

use crate::to_storage_err;

/// Create the single-row `validator_state` table.
pub fn migrate(conn: &Connection) -> VigilResult<()> {
    conn.execute_batch(
        "CREATE TABLE validator_state (
            id             INTEGER PRIMARY KEY CHECK (id = 1),
            step           INTEGER NOT NULL,
            scores         TEXT NOT NULL,
            identities     TEXT NOT NULL,
            schema_version INTEGER NOT NULL,
            saved_at       TEXT NOT NULL
        );",
    )
    .map_err(to_storage_err)
}
