//! Compiled defaults for every config field.

// Run loop
pub const DEFAULT_EPOCH_LENGTH: u64 = 100;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;
pub const DEFAULT_NUM_CONCURRENT_FORWARDS: usize = 1;
pub const DEFAULT_WEIGHTS_EVERY_EPOCHS: u64 = 1;
pub const DEFAULT_SAVE_EVERY_EPOCHS: u64 = 1;
pub const DEFAULT_LEDGER_WRITE_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_STOP_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_DISABLE_SET_WEIGHTS: bool = false;

// Scoring
pub const DEFAULT_MOVING_AVERAGE_ALPHA: f64 = 0.1;
pub const DEFAULT_VERSION_KEY: u64 = crate::constants::DEFAULT_VERSION_KEY;

// Dispatch
pub const DEFAULT_SAMPLE_SIZE: usize = 50;
pub const DEFAULT_QUERY_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_MAX_IN_FLIGHT: usize = 64;
pub const DEFAULT_VPERMIT_STAKE_LIMIT: f64 = 4096.0;
pub const DEFAULT_TIMEOUT_SLACK_MS: u64 = 250;

// Storage
pub const DEFAULT_STATE_DB_FILENAME: &str = "vigil_state.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;

// Observability
pub const DEFAULT_LOG_FILTER: &str = "vigil=info";
pub const DEFAULT_JSON_LOGS: bool = false;
pub const DEFAULT_STATUS_TOP_N: usize = 10;
