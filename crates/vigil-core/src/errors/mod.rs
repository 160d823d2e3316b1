mod config_error;
mod dispatch_error;
mod ledger_error;
mod lifecycle_error;
mod registration_error;
mod storage_error;
mod vigil_error;

pub use config_error::ConfigError;
pub use dispatch_error::DispatchError;
pub use ledger_error::LedgerError;
pub use lifecycle_error::LifecycleError;
pub use registration_error::RegistrationError;
pub use storage_error::StorageError;
pub use vigil_error::{VigilError, VigilResult};
