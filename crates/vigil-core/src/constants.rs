/// Vigil system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Largest value a quantized weight can take on the ledger.
pub const U16_MAX_WEIGHT: u16 = u16::MAX;

/// Version key attached to submissions when none is configured.
pub const DEFAULT_VERSION_KEY: u64 = 1;

/// Schema version of the persisted validator state.
pub const STATE_SCHEMA_VERSION: u32 = 1;

/// Environment variable prefix for config overrides.
pub const ENV_PREFIX: &str = "VIGIL_";
