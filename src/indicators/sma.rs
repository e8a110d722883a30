// Simple Moving Average: unweighted mean of the trailing `period` values.

use super::place;

/// Element `i` of the result is the mean of `values[i..i + period]`.
pub fn calculate_sma(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let divisor = period as f64;
    values
        .windows(period)
        .map(|w| w.iter().sum::<f64>() / divisor)
        .collect()
}

/// SMA aligned 1:1 with `values`; the first `period - 1` positions are `None`.
pub fn sma_column(values: &[f64], period: usize) -> Vec<Option<f64>> {
    place(&calculate_sma(values, period), period.saturating_sub(1), values.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_insufficient_data() {
        assert!(calculate_sma(&[1.0, 2.0], 3).is_empty());
        assert_eq!(sma_column(&[1.0, 2.0], 3), vec![None, None]);
    }

    #[test]
    fn sma_known_values() {
        let sma = calculate_sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(sma, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn sma_200_defined_only_at_last_of_200() {
        let values: Vec<f64> = (0..200).map(|i| 90.0 + i as f64 * 0.1).collect();
        let col = sma_column(&values, 200);
        assert!(col[..199].iter().all(Option::is_none));
        let expected = values.iter().sum::<f64>() / 200.0;
        assert!((col[199].unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn sma_of_flat_series_is_exact() {
        let col = sma_column(&[100.0; 201], 200);
        assert_eq!(col[199], Some(100.0));
        assert_eq!(col[200], Some(100.0));
    }
}
