use std::sync::Arc;

use vigil_core::models::WeightLimits;
use vigil_core::traits::NoopObserver;
use vigil_scoring::{normalize_l1, WeightEncoder};

fn encoder() -> WeightEncoder {
    WeightEncoder::new(7, Arc::new(NoopObserver))
}

#[test]
fn normalized_output_sums_to_one() {
    let w = normalize_l1(&[0.36, 0.0, 0.2, 0.0]);
    let total: f64 = w.iter().sum();
    assert!((total - 1.0).abs() < 1e-12);
    assert!(w.iter().all(|x| *x >= 0.0));
}

#[test]
fn all_zero_scores_encode_to_empty_submission() {
    let submission = encoder()
        .encode(&[0.0, 0.0, 0.0], &WeightLimits::default(), 10)
        .unwrap();
    assert!(submission.is_empty());
    assert_eq!(submission.height(), 10);
}

#[test]
fn encode_is_deterministic() {
    let scores = [0.36, 0.0, 0.2, 0.0, 0.123_456_789, 1e-9];
    let limits = WeightLimits::default();
    let a = encoder().encode(&scores, &limits, 5).unwrap();
    let b = encoder().encode(&scores, &limits, 5).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.weights(), b.weights());
}

#[test]
fn scenario_scores_encode_by_ratio() {
    let submission = encoder()
        .encode(&[0.36, 0.0, 0.2, 0.0], &WeightLimits::default(), 42)
        .unwrap();
    assert_eq!(submission.ordinals(), &[0, 2]);
    // 0.2 / 0.36 * 65535 = 36408.33…
    assert_eq!(submission.weights(), &[65535, 36408]);
    assert_eq!(submission.version_key(), 7);
}

#[test]
fn nan_scores_do_not_poison_submission() {
    let submission = encoder()
        .encode(&[f64::NAN, 0.5, 0.5], &WeightLimits::default(), 1)
        .unwrap();
    assert_eq!(submission.ordinals(), &[1, 2]);
    assert_eq!(submission.weights(), &[65535, 65535]);
}

#[test]
fn entry_count_limit_respected() {
    let limits = WeightLimits {
        max_weights: 3,
        ..Default::default()
    };
    let scores: Vec<f64> = (1..=10).map(f64::from).collect();
    let submission = encoder().encode(&scores, &limits, 1).unwrap();
    assert_eq!(submission.ordinals(), &[7, 8, 9]);
}
