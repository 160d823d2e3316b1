use serde_json::json;

use vigil_core::models::{Request, Response};
use vigil_core::traits::IRewardFunction;

/// Sends the step number and rewards peers answering with exactly twice it.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoReward;

impl IRewardFunction for EchoReward {
    fn make_request(&self, step: u64) -> Request {
        Request {
            step,
            payload: json!(step),
        }
    }

    fn reward(&self, request: &Request, response: &Response) -> f64 {
        let expected = request.payload.as_u64().map(|v| v * 2);
        if expected.is_some() && response.payload.as_u64() == expected {
            1.0
        } else {
            0.0
        }
    }
}

/// Uses the response payload itself as the reward; non-numeric is NaN.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadReward;

impl IRewardFunction for PayloadReward {
    fn make_request(&self, step: u64) -> Request {
        Request {
            step,
            payload: json!({ "step": step }),
        }
    }

    fn reward(&self, _request: &Request, response: &Response) -> f64 {
        response.payload.as_f64().unwrap_or(f64::NAN)
    }
}
