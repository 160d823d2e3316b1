//! PRAGMA configuration applied to the state connection.
//!
//! WAL mode, FULL sync (a save must survive power loss), busy timeout.

use rusqlite::Connection;

use vigil_core::errors::VigilResult;

use crate::to_storage_err;

/// WAL journal, full sync and the busy timeout.
pub fn apply_pragmas(conn: &Connection, busy_timeout_ms: u32) -> VigilResult<()> {
    conn.execute_batch(&format!(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = FULL;
        PRAGMA busy_timeout = {busy_timeout_ms};
        "
    ))
    .map_err(to_storage_err)?;
    Ok(())
}

/// Verify that WAL mode is active on a connection.
pub fn verify_wal_mode(conn: &Connection) -> VigilResult<bool> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(to_storage_err)?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
