//! Ledger limits applied between normalization and quantization.

use vigil_core::models::WeightLimits;

/// Floor given to every ordinal when too few carry weight.
const MIN_WEIGHT_FLOOR: f64 = 1e-5;

/// Maximum redistribution rounds when capping weights.
const MAX_CAP_ROUNDS: usize = 64;

/// Apply ledger limits to a normalized vector.
///
/// Returns `(ordinal, weight)` pairs in ascending ordinal order, summing to 1
/// (or empty when nothing carries weight):
/// - negative weights are clamped to 0;
/// - if fewer than `min_allowed_weights` entries are non-zero, every ordinal
///   receives a small floor so the submission meets the minimum;
/// - only the `max_weights` largest entries are kept (ties: lower ordinal);
/// - no entry exceeds `max_weight_limit`, excess mass is redistributed
///   proportionally over the uncapped entries.
pub fn apply_limits(normalized: &[f64], limits: &WeightLimits) -> Vec<(usize, f64)> {
    let clamped: Vec<f64> = normalized
        .iter()
        .map(|w| if w.is_finite() && *w > 0.0 { *w } else { 0.0 })
        .collect();

    let non_zero = clamped.iter().filter(|w| **w > 0.0).count();
    if non_zero == 0 {
        return Vec::new();
    }

    let mut entries: Vec<(usize, f64)> = if non_zero < limits.min_allowed_weights {
        clamped
            .iter()
            .enumerate()
            .map(|(ordinal, w)| (ordinal, w + MIN_WEIGHT_FLOOR))
            .collect()
    } else {
        clamped
            .iter()
            .enumerate()
            .filter(|(_, w)| **w > 0.0)
            .map(|(ordinal, w)| (ordinal, *w))
            .collect()
    };

    if entries.len() > limits.max_weights {
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        entries.truncate(limits.max_weights);
        entries.sort_by_key(|(ordinal, _)| *ordinal);
    }

    cap_weights(&mut entries, limits.max_weight_limit);
    entries
}

/// Renormalize to sum 1 with no entry above `limit`.
fn cap_weights(entries: &mut [(usize, f64)], limit: f64) {
    let n = entries.len();
    if n == 0 {
        return;
    }
    if !(limit > 0.0) || (n as f64) * limit <= 1.0 {
        let uniform = 1.0 / n as f64;
        entries.iter_mut().for_each(|e| e.1 = uniform);
        return;
    }

    let total: f64 = entries.iter().map(|e| e.1).sum();
    entries.iter_mut().for_each(|e| e.1 /= total);

    let mut capped = vec![false; n];
    for _ in 0..MAX_CAP_ROUNDS {
        let over: Vec<usize> = (0..n)
            .filter(|&i| !capped[i] && entries[i].1 > limit)
            .collect();
        if over.is_empty() {
            break;
        }
        for &i in &over {
            capped[i] = true;
        }
        let fixed_mass = capped.iter().filter(|c| **c).count() as f64 * limit;
        let free_mass: f64 = (0..n).filter(|&i| !capped[i]).map(|i| entries[i].1).sum();
        let scale = if free_mass > 0.0 {
            (1.0 - fixed_mass) / free_mass
        } else {
            0.0
        };
        for i in 0..n {
            entries[i].1 = if capped[i] { limit } else { entries[i].1 * scale };
        }
    }
}
