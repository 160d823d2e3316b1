//! Span definitions per run-loop operation: epoch, forward pass, weight
//! submission, state save.

/// Create an epoch span.
#[macro_export]
macro_rules! epoch_span {
    ($step:expr, $height:expr) => {
        tracing::info_span!("vigil.epoch", step = $step, height = $height)
    };
}

/// Create a forward-pass span.
#[macro_export]
macro_rules! forward_span {
    ($step:expr, $pass:expr) => {
        tracing::debug_span!("vigil.forward", step = $step, pass = $pass)
    };
}

/// Create a weight-submission span.
#[macro_export]
macro_rules! submit_span {
    ($height:expr) => {
        tracing::info_span!("vigil.submit", height = $height)
    };
}

/// Create a state-save span.
#[macro_export]
macro_rules! save_span {
    ($step:expr) => {
        tracing::debug_span!("vigil.save", step = $step)
    };
}
