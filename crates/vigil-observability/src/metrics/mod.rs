//! Counters accumulated across epochs.

mod epoch_metrics;

pub use epoch_metrics::EpochMetrics;
