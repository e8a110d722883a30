// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = value_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The first EMA value is seeded with the SMA of the first `period` values, so
// the first defined position is index `period - 1`.
// =============================================================================

use super::place;

/// Compute the EMA of `values` for `period`.
///
/// Element `i` of the result corresponds to input index `period - 1 + i`.
/// Returns an empty `Vec` when `period == 0` or the input is shorter than
/// `period`.  Production stops at the first non-finite value.
pub fn calculate_ema(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period + 1) as f64;

    let seed: f64 = values[..period].iter().sum::<f64>() / period as f64;
    if !seed.is_finite() {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(values.len() - period + 1);
    result.push(seed);

    let mut prev = seed;
    for &value in &values[period..] {
        let ema = value * multiplier + prev * (1.0 - multiplier);
        if !ema.is_finite() {
            break;
        }
        result.push(ema);
        prev = ema;
    }

    result
}

/// EMA aligned 1:1 with `values`; warm-up positions are `None`.
pub fn ema_column(values: &[f64], period: usize) -> Vec<Option<f64>> {
    place(&calculate_ema(values, period), period.saturating_sub(1), values.len())
}
