use crate::errors::VigilResult;
use crate::models::PersistedState;

/// Durable snapshot/restore of tracker state.
///
/// `save` is atomic: a crash mid-write leaves the last good copy readable.
pub trait IStateStore: Send + Sync {
    fn save(&self, state: &PersistedState) -> VigilResult<()>;

    /// `None` when nothing has been saved yet.
    fn load(&self) -> VigilResult<Option<PersistedState>>;
}
