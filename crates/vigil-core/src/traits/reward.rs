use crate::models::{Request, Response};

/// Supplied by the embedding application. Pure from the core's point of view.
pub trait IRewardFunction: Send + Sync {
    /// Request sent to the sampled peers of one forward pass.
    fn make_request(&self, step: u64) -> Request;

    /// Score a single response. NaN is tolerated and sanitized downstream.
    fn reward(&self, request: &Request, response: &Response) -> f64;
}
