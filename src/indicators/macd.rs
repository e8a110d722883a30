// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   MACD      = EMA(close, fast) - EMA(close, slow)
//   Signal    = EMA(MACD, signal)      seeded over the first defined MACD values
//   Histogram = MACD - Signal
//
// With the 12/26/9 defaults the MACD line is defined from index 25 and the
// signal line / histogram from index 33.
// =============================================================================

use super::ema::{calculate_ema, ema_column};
use super::place;

/// Position-aligned MACD output.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdColumns {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

pub fn macd_columns(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdColumns {
    let len = closes.len();
    let fast_col = ema_column(closes, fast);
    let slow_col = ema_column(closes, slow);

    let macd: Vec<Option<f64>> = fast_col
        .iter()
        .zip(&slow_col)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();

    let signal_col = match macd.iter().position(Option::is_some) {
        Some(start) => {
            let defined: Vec<f64> = macd[start..].iter().map_while(|v| *v).collect();
            place(
                &calculate_ema(&defined, signal),
                start + signal.saturating_sub(1),
                len,
            )
        }
        None => vec![None; len],
    };

    let histogram = macd
        .iter()
        .zip(&signal_col)
        .map(|(m, s)| Some((*m)? - (*s)?))
        .collect();

    MacdColumns {
        macd,
        signal: signal_col,
        histogram,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wave(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + 5.0 * (i as f64 * 0.2).sin() + i as f64 * 0.05)
            .collect()
    }

    #[test]
    fn warm_up_positions_for_default_periods() {
        let out = macd_columns(&wave(60), 12, 26, 9);
        assert_eq!(out.macd.len(), 60);
        assert!(out.macd[..25].iter().all(Option::is_none));
        assert!(out.macd[25..].iter().all(Option::is_some));
        assert!(out.signal[..33].iter().all(Option::is_none));
        assert!(out.signal[33..].iter().all(Option::is_some));
        assert!(out.histogram[..33].iter().all(Option::is_none));
        assert!(out.histogram[33..].iter().all(Option::is_some));
    }

    #[test]
    fn macd_is_difference_of_emas() {
        let closes = wave(40);
        let out = macd_columns(&closes, 12, 26, 9);
        let fast = ema_column(&closes, 12);
        let slow = ema_column(&closes, 26);
        let expected = fast[39].unwrap() - slow[39].unwrap();
        assert!((out.macd[39].unwrap() - expected).abs() < 1e-10);
    }

    #[test]
    fn signal_seed_is_mean_of_first_nine_macd_values() {
        let out = macd_columns(&wave(40), 12, 26, 9);
        let seed: f64 = out.macd[25..34].iter().map(|v| v.unwrap()).sum::<f64>() / 9.0;
        assert!((out.signal[33].unwrap() - seed).abs() < 1e-10);
        let hist = out.macd[33].unwrap() - out.signal[33].unwrap();
        assert!((out.histogram[33].unwrap() - hist).abs() < 1e-12);
    }

    #[test]
    fn short_series_is_all_undefined() {
        let out = macd_columns(&wave(20), 12, 26, 9);
        assert!(out.macd.iter().all(Option::is_none));
        assert!(out.signal.iter().all(Option::is_none));
        assert!(out.histogram.iter().all(Option::is_none));
    }

    #[test]
    fn flat_series_has_zero_macd() {
        let out = macd_columns(&[100.0; 50], 12, 26, 9);
        assert!(out.macd[49].unwrap().abs() < 1e-9);
        assert!(out.signal[49].unwrap().abs() < 1e-9);
    }
}
