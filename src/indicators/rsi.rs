// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// Step 1 — Price changes (deltas) from consecutive closes.
// Step 2 — Seed average gain / average loss with the SMA of the first
//          `period` gains / losses.
// Step 3 — Wilder smoothing:
//            avg_gain = (prev_avg_gain * (period - 1) + gain) / period
//            avg_loss = (prev_avg_loss * (period - 1) + loss) / period
// Step 4 — RS = avg_gain / avg_loss,  RSI = 100 - 100 / (1 + RS)
//
// `period` deltas need `period + 1` closes, so the first defined position is
// index `period`.
// =============================================================================

use super::place;

/// Value reported when neither gains nor losses occurred over the window.
pub const NEUTRAL_RSI: f64 = 50.0;

/// Compute the RSI series for `closes`.
///
/// Element `i` of the result corresponds to close index `period + i`.
///
/// # Edge cases
/// - `period == 0` or fewer than `period + 1` closes => empty vec
/// - Average loss of zero with some gain => exactly 100.0
/// - No movement at all => [`NEUTRAL_RSI`]
/// - Production stops at the first non-finite value.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period + 1 {
        return Vec::new();
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    let (sum_gain, sum_loss) = deltas[..period].iter().fold((0.0_f64, 0.0_f64), |(g, l), &d| {
        if d > 0.0 {
            (g + d, l)
        } else {
            (g, l - d)
        }
    });

    let period_f = period as f64;
    let mut avg_gain = sum_gain / period_f;
    let mut avg_loss = sum_loss / period_f;

    let mut result = Vec::with_capacity(deltas.len() - period + 1);
    match rsi_from_averages(avg_gain, avg_loss) {
        Some(rsi) => result.push(rsi),
        None => return result,
    }

    for &delta in &deltas[period..] {
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);

        avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;

        match rsi_from_averages(avg_gain, avg_loss) {
            Some(rsi) => result.push(rsi),
            None => break,
        }
    }

    result
}

/// RSI aligned 1:1 with `closes`; the first `period` positions are `None`.
pub fn rsi_column(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    place(&calculate_rsi(closes, period), period, closes.len())
}

/// Convert average gain / average loss into an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rsi = if avg_loss == 0.0 && avg_gain == 0.0 {
        NEUTRAL_RSI
    } else if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    rsi.is_finite().then_some(rsi)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_period_zero() {
        assert!(calculate_rsi(&[1.0, 2.0, 3.0], 0).is_empty());
    }

    #[test]
    fn rsi_insufficient_data() {
        // 14 closes => 13 deltas < 14.
        let closes: Vec<f64> = (1..=14).map(|x| x as f64).collect();
        assert!(calculate_rsi(&closes, 14).is_empty());
        assert!(rsi_column(&closes, 14).iter().all(Option::is_none));
    }

    #[test]
    fn rsi_column_first_defined_at_period() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + (i as f64).sin()).collect();
        let col = rsi_column(&closes, 14);
        assert_eq!(col.len(), 20);
        assert!(col[..14].iter().all(Option::is_none));
        assert!(col[14..].iter().all(Option::is_some));
    }

    #[test]
    fn rsi_all_gains_is_exactly_100() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let series = calculate_rsi(&closes, 14);
        assert!(!series.is_empty());
        assert!(series.iter().all(|&v| v == 100.0));
    }

    #[test]
    fn rsi_all_losses_is_zero() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        let series = calculate_rsi(&closes, 14);
        assert!(!series.is_empty());
        for &v in &series {
            assert!(v.abs() < 1e-10, "expected 0.0, got {v}");
        }
    }

    #[test]
    fn rsi_flat_market_is_neutral() {
        let series = calculate_rsi(&[100.0; 30], 14);
        assert_eq!(series.len(), 16);
        assert!(series.iter().all(|&v| v == NEUTRAL_RSI));
    }

    #[test]
    fn rsi_wilder_reference_value() {
        // Wilder's worked example: first RSI over 14 deltas ~ 70.46.
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
            45.61, 46.28, 46.28,
        ];
        let series = calculate_rsi(&closes, 14);
        assert_eq!(series.len(), 1);
        assert!((series[0] - 70.46).abs() < 0.01, "got {}", series[0]);
    }

    #[test]
    fn rsi_range_check() {
        let closes: Vec<f64> = (0..300)
            .map(|i| 100.0 + 10.0 * (i as f64 * 0.37).sin() + (i as f64 * 1.3).cos())
            .collect();
        for v in calculate_rsi(&closes, 14) {
            assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
        }
    }

    #[test]
    fn rsi_up_bar_raises_rsi_when_losses_exist() {
        let mut closes: Vec<f64> = (0..20).map(|i| 100.0 - i as f64 * 0.5).collect();
        closes.push(closes[19] + 0.2);
        let col = rsi_column(&closes, 14);
        assert!(col[20].unwrap() > col[19].unwrap());
    }
}
