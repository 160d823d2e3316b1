//! # vigil-runloop
//!
//! The validator's control loop. [`RunLoopController`] verifies
//! registration, then drives epochs on a background thread until stopped:
//! roster refresh, score reconciliation, concurrent forward passes, weight
//! submission and state persistence.

pub mod cancellation;
pub mod collaborators;
pub mod controller;
mod epoch;
mod startup;
pub mod state;

pub use cancellation::{CancellationToken, StopHandle};
pub use collaborators::Collaborators;
pub use controller::RunLoopController;
pub use state::{RunState, StatusReport};
