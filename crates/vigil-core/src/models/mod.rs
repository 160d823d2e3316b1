//! Data model shared by every subsystem.

mod event;
mod identity;
mod peer;
mod query;
mod reward;
mod roster;
mod state;
mod submission;

pub use event::{RunEvent, SkipReason, StatusLine};
pub use identity::{Identity, IdentityTable};
pub use peer::PeerRecord;
pub use query::{PeerOutcome, QueryFailure, Request, Response};
pub use reward::{RewardBatch, RewardEntry};
pub use roster::{RosterQuery, RosterSnapshot};
pub use state::PersistedState;
pub use submission::{SubmitOutcome, WeightLimits, WeightSubmission};
