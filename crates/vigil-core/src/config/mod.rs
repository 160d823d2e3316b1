pub mod defaults;
mod dispatch_config;
mod observability_config;
mod runloop_config;
mod scoring_config;
mod storage_config;
mod vigil_config;

pub use dispatch_config::DispatchConfig;
pub use observability_config::ObservabilityConfig;
pub use runloop_config::RunLoopConfig;
pub use scoring_config::ScoringConfig;
pub use storage_config::StorageConfig;
pub use vigil_config::VigilConfig;
