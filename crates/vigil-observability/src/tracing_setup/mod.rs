//! Tracing setup: subscriber installation and span definitions.

pub mod spans;

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vigil_core::config::ObservabilityConfig;

static INIT: Once = Once::new();

/// Install the process-wide subscriber.
///
/// Reads `VIGIL_LOG` for per-module levels, e.g.
/// `VIGIL_LOG=vigil_runloop=debug,vigil_dispatch=warn`. Falls back to the
/// configured filter. Only binaries call this; library code never installs
/// a subscriber. Idempotent.
pub fn init_tracing(config: &ObservabilityConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("VIGIL_LOG")
            .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

        if config.json_logs {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .with(filter)
                .init();
        } else {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_thread_ids(true))
                .with(filter)
                .init();
        }
    });
}

/// Initialize tracing with a custom filter string (for tests or embedding).
/// Returns `false` when a global subscriber already exists.
pub fn init_tracing_with_filter(filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(true)
        .with_test_writer()
        .try_init()
        .is_ok()
}
