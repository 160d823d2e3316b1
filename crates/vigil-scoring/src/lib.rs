//! # vigil-scoring
//!
//! Per-peer exponential moving average scores that survive roster churn,
//! and the two-stage transform turning them into a ledger submission.
//!
//! ## Modules
//!
//! - [`tracker`]: `ScoreTracker`: reconcile against a roster, sparse EMA update
//! - [`encoder`]: `WeightEncoder`: L1 normalize, apply ledger limits, quantize to u16

pub mod encoder;
pub mod tracker;

pub use encoder::{normalize_l1, quantize, WeightEncoder};
pub use tracker::{ScoreTracker, UpdateReport};
