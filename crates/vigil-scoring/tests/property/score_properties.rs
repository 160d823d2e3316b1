use std::sync::Arc;

use proptest::prelude::*;
use test_fixtures::roster_of_size;
use vigil_core::models::{RewardBatch, WeightLimits};
use vigil_core::traits::NoopObserver;
use vigil_scoring::{normalize_l1, quantize, ScoreTracker, WeightEncoder};

fn arb_reward() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => -10.0f64..10.0,
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
    ]
}

proptest! {
    #[test]
    fn scores_always_finite_after_update(
        rewards in prop::collection::vec((0usize..8, arb_reward()), 0..32),
        alpha in 0.001f64..=1.0,
    ) {
        let mut tracker = ScoreTracker::new(Arc::new(NoopObserver));
        tracker.reconcile(&roster_of_size(1, 8));
        tracker.update(&RewardBatch::from_pairs(rewards), alpha).unwrap();
        prop_assert!(tracker.scores().iter().all(|s| s.is_finite()));
    }

    #[test]
    fn constant_reward_moves_toward_target(
        reward in 0.0f64..1.0,
        alpha in 0.01f64..=1.0,
    ) {
        let mut tracker = ScoreTracker::new(Arc::new(NoopObserver));
        tracker.reconcile(&roster_of_size(1, 1));
        let mut prev_gap = reward.abs();
        for _ in 0..20 {
            tracker.update(&RewardBatch::from_pairs([(0, reward)]), alpha).unwrap();
            let gap = (reward - tracker.score(0).unwrap()).abs();
            prop_assert!(gap <= prev_gap + 1e-12);
            prev_gap = gap;
        }
    }

    #[test]
    fn growth_never_touches_existing_prefix(
        initial in prop::collection::vec(0.0f64..1.0, 1..16),
        extra in 1usize..16,
    ) {
        let n = initial.len();
        let mut tracker = ScoreTracker::new(Arc::new(NoopObserver));
        tracker.reconcile(&roster_of_size(1, n));
        tracker
            .update(&RewardBatch::from_pairs(initial.iter().copied().enumerate()), 1.0)
            .unwrap();

        tracker.reconcile(&roster_of_size(2, n + extra));
        prop_assert_eq!(&tracker.scores()[..n], &initial[..]);
        prop_assert!(tracker.scores()[n..].iter().all(|s| *s == 0.0));
    }

    #[test]
    fn normalization_sums_to_one(scores in prop::collection::vec(0.0f64..100.0, 1..64)) {
        let w = normalize_l1(&scores);
        let total: f64 = w.iter().sum();
        if scores.iter().all(|s| *s == 0.0) {
            prop_assert!(w.iter().all(|x| *x == 0.0));
        } else {
            prop_assert!((total - 1.0).abs() < 1e-9);
            prop_assert!(w.iter().all(|x| *x >= 0.0));
        }
    }

    #[test]
    fn quantization_is_deterministic(scores in prop::collection::vec(0.0f64..1.0, 0..64)) {
        let pairs: Vec<(usize, f64)> = normalize_l1(&scores).into_iter().enumerate().collect();
        prop_assert_eq!(quantize(&pairs), quantize(&pairs));

        let encoder = WeightEncoder::new(1, Arc::new(NoopObserver));
        let limits = WeightLimits::default();
        let a = encoder.encode(&scores, &limits, 3).unwrap();
        let b = encoder.encode(&scores, &limits, 3).unwrap();
        prop_assert_eq!(a, b);
    }
}
