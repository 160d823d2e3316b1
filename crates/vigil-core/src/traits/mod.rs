//! Collaborator contracts consumed by the core.

mod endpoint;
mod ledger;
mod observer;
mod reward;
mod store;
mod transport;

pub use endpoint::IServedEndpoint;
pub use ledger::{ILedgerReader, ILedgerWriter};
pub use observer::{IRunObserver, NoopObserver};
pub use reward::IRewardFunction;
pub use store::IStateStore;
pub use transport::IPeerTransport;
