//! Fixed-precision u16 quantization.

use vigil_core::constants::U16_MAX_WEIGHT;

/// Scale weights by their maximum into `0..=u16::MAX`, rounding to nearest.
///
/// Entries that round to 0 fall below the ledger's granularity and are
/// dropped. Output keeps the input's ordinal order.
pub fn quantize(weights: &[(usize, f64)]) -> (Vec<usize>, Vec<u16>) {
    let max = weights
        .iter()
        .map(|(_, w)| *w)
        .filter(|w| w.is_finite())
        .fold(0.0_f64, f64::max);
    if max <= 0.0 {
        return (Vec::new(), Vec::new());
    }

    let mut ordinals = Vec::with_capacity(weights.len());
    let mut quantized = Vec::with_capacity(weights.len());
    for &(ordinal, w) in weights {
        if !w.is_finite() || w <= 0.0 {
            continue;
        }
        let scaled = (w / max * f64::from(U16_MAX_WEIGHT)).round();
        let q = scaled.clamp(0.0, f64::from(U16_MAX_WEIGHT)) as u16;
        if q == 0 {
            continue;
        }
        ordinals.push(ordinal);
        quantized.push(q);
    }
    (ordinals, quantized)
}
