//! Work done on `start()` before the background thread exists.

use tracing::{info, warn};

use vigil_core::errors::{RegistrationError, VigilResult};
use vigil_core::models::{Identity, RosterQuery, RosterSnapshot};

use crate::collaborators::Collaborators;
use crate::state::Shared;

/// Restore persisted state into the shared tracker. Returns the step to
/// resume from, or `None` when starting fresh.
///
/// Nothing here is fatal: a missing or unreadable state means a fresh start.
pub(crate) fn restore_state(
    collaborators: &Collaborators,
    shared: &Shared,
    fresh_start: bool,
) -> Option<u64> {
    let store = collaborators.store.as_ref()?;
    if fresh_start {
        info!("fresh start requested, ignoring persisted state");
        return None;
    }

    let state = match store.load() {
        Ok(Some(state)) => state,
        Ok(None) => {
            info!("no persisted state, starting fresh");
            return None;
        }
        Err(e) => {
            warn!(error = %e, "persisted state unreadable, starting fresh");
            return None;
        }
    };

    let step = state.step;
    let peers = state.scores.len();
    match shared.tracker.write().restore(state) {
        Ok(()) => {
            info!(step, peers, "restored persisted state");
            Some(step)
        }
        Err(e) => {
            warn!(error = %e, "persisted state rejected, starting fresh");
            None
        }
    }
}

/// Confirm the validator is registered and present in the current roster.
/// Ledger failures here are returned as-is; the caller treats every error
/// as fatal.
pub(crate) async fn verify_registration(
    collaborators: &Collaborators,
    identity: &Identity,
) -> VigilResult<RosterSnapshot> {
    if !collaborators.reader.is_registered(identity).await? {
        return Err(RegistrationError::NotRegistered {
            identity: identity.to_string(),
        }
        .into());
    }

    let snapshot = collaborators.reader.roster(RosterQuery::Latest).await?;
    if !snapshot.contains(identity) {
        return Err(RegistrationError::NotInRoster {
            identity: identity.to_string(),
            height: snapshot.height(),
        }
        .into());
    }
    info!(
        identity = %identity,
        height = snapshot.height(),
        roster = snapshot.len(),
        "registration verified"
    );
    Ok(snapshot)
}
