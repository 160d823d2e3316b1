//! # vigil-core
//!
//! Foundation crate for the Vigil validator.
//! Defines the roster/score/submission types, collaborator traits, errors,
//! config, and constants. Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::VigilConfig;
pub use errors::{VigilError, VigilResult};
pub use models::{
    Identity, IdentityTable, PeerRecord, PersistedState, RewardBatch, RosterQuery,
    RosterSnapshot, RunEvent, WeightLimits, WeightSubmission,
};
