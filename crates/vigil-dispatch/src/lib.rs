//! # vigil-dispatch
//!
//! Choosing which peers to query and querying them.
//!
//! - [`selection`]: `PeerSelector`: uniform sample over available peers
//! - [`dispatcher`]: `RequestDispatcher`: fan-out/fan-in barrier with
//!   independent per-peer timeouts

pub mod dispatcher;
pub mod selection;

pub use dispatcher::RequestDispatcher;
pub use selection::PeerSelector;
