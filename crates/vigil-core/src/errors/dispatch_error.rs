/// Errors raised by the request fan-out itself (never by individual peers).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    #[error("no available peers in roster at height {height}")]
    NoAvailablePeers { height: u64 },

    #[error("dispatch permit pool closed")]
    PermitPoolClosed,
}
