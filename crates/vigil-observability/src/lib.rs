//! # vigil-observability
//!
//! Logging and diagnostics for the validator.
//!
//! ## Modules
//!
//! - [`tracing_setup`]: subscriber installation and span macros
//! - [`observer`]: `IRunObserver` implementations (tracing, recording, fan-out)
//! - [`metrics`]: per-epoch counters reported in status lines

pub mod metrics;
pub mod observer;
pub mod tracing_setup;

pub use metrics::EpochMetrics;
pub use observer::{FanoutObserver, RecordingObserver, TracingObserver};
pub use tracing_setup::{init_tracing, init_tracing_with_filter};
