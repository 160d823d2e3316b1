/// L1-normalize a score vector.
///
/// Non-finite entries count as 0. A zero sum yields an all-zero vector.
/// For non-negative input the result is non-negative and sums to 1.
pub fn normalize_l1(scores: &[f64]) -> Vec<f64> {
    let clean = |s: f64| if s.is_finite() { s } else { 0.0 };
    let total: f64 = scores.iter().map(|s| clean(*s).abs()).sum();
    if total == 0.0 || !total.is_finite() {
        return vec![0.0; scores.len()];
    }
    scores.iter().map(|s| clean(*s) / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_vector_stays_zero() {
        assert_eq!(normalize_l1(&[0.0, 0.0, 0.0]), vec![0.0, 0.0, 0.0]);
        assert!(normalize_l1(&[]).is_empty());
    }

    #[test]
    fn sums_to_one() {
        let w = normalize_l1(&[1.0, 3.0]);
        assert_eq!(w, vec![0.25, 0.75]);
    }

    #[test]
    fn negative_entries_use_absolute_sum() {
        let w = normalize_l1(&[-1.0, 3.0]);
        assert_eq!(w, vec![-0.25, 0.75]);
    }

    #[test]
    fn nan_counts_as_zero() {
        let w = normalize_l1(&[f64::NAN, 2.0]);
        assert_eq!(w, vec![0.0, 1.0]);
    }
}
