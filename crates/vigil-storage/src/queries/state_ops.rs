//! Row-level reads and writes of `validator_state`.

use rusqlite::{params, Connection, OptionalExtension};

use vigil_core::constants::STATE_SCHEMA_VERSION;
use vigil_core::errors::{StorageError, VigilError, VigilResult};
use vigil_core::models::{IdentityTable, PersistedState};

use crate::to_storage_err;

/// Replace the single state row. Must run inside a transaction.
pub fn replace_state(conn: &Connection, state: &PersistedState) -> VigilResult<()> {
    let step = i64::try_from(state.step).map_err(|_| {
        VigilError::ValidationError(format!("step {} exceeds storable range", state.step))
    })?;
    // Exact f64 text round-trip needs serde_json's `float_roundtrip` feature.
    let scores = serde_json::to_string(&state.scores)?;
    let identities = serde_json::to_string(&state.identities)?;

    conn.execute(
        "INSERT OR REPLACE INTO validator_state
            (id, step, scores, identities, schema_version, saved_at)
         VALUES (1, ?1, ?2, ?3, ?4, ?5)",
        params![
            step,
            scores,
            identities,
            STATE_SCHEMA_VERSION,
            chrono::Utc::now().to_rfc3339()
        ],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

struct RawState {
    step: i64,
    scores: String,
    identities: String,
    schema_version: u32,
}

/// Read the state row. A row that does not decode is `CorruptState`.
pub fn get_state(conn: &Connection) -> VigilResult<Option<PersistedState>> {
    let raw = conn
        .query_row(
            "SELECT step, scores, identities, schema_version
             FROM validator_state WHERE id = 1",
            [],
            |row| {
                Ok(RawState {
                    step: row.get(0)?,
                    scores: row.get(1)?,
                    identities: row.get(2)?,
                    schema_version: row.get(3)?,
                })
            },
        )
        .optional()
        .map_err(to_storage_err)?;

    raw.map(decode).transpose()
}

fn decode(raw: RawState) -> VigilResult<PersistedState> {
    if raw.schema_version > STATE_SCHEMA_VERSION {
        return Err(corrupt(format!(
            "state written by schema v{}, this build reads up to v{}",
            raw.schema_version, STATE_SCHEMA_VERSION
        )));
    }
    let step = u64::try_from(raw.step).map_err(|_| corrupt(format!("negative step {}", raw.step)))?;
    let scores: Vec<f64> = serde_json::from_str(&raw.scores)
        .map_err(|e| corrupt(format!("scores column: {e}")))?;
    let identities: IdentityTable = serde_json::from_str(&raw.identities)
        .map_err(|e| corrupt(format!("identities column: {e}")))?;

    let state = PersistedState {
        step,
        scores,
        identities,
    };
    if !state.is_consistent() {
        return Err(corrupt(format!(
            "{} scores for {} identities",
            state.scores.len(),
            state.identities.len()
        )));
    }
    Ok(state)
}

/// When the current row was written, if any.
pub fn saved_at(conn: &Connection) -> VigilResult<Option<String>> {
    conn.query_row(
        "SELECT saved_at FROM validator_state WHERE id = 1",
        [],
        |row| row.get(0),
    )
    .optional()
    .map_err(to_storage_err)
}

/// Remove the state row if present.
pub fn delete_state(conn: &Connection) -> VigilResult<()> {
    conn.execute("DELETE FROM validator_state", [])
        .map_err(to_storage_err)?;
    Ok(())
}

fn corrupt(details: String) -> VigilError {
    StorageError::CorruptState { details }.into()
}
