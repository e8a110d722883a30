// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free indicator math.  Each indicator offers a compact
// `calculate_*` form (values from the first warmed position onward) and a
// `*_column` form aligned 1:1 with its input, where warm-up positions are
// `None`.  Only past and current values feed each position.
//
// `IndicatorFrame` bundles the derived columns for a `Series` without touching
// its bars.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

use serde::Serialize;

use crate::market_data::Series;
use crate::runtime_config::StrategyParams;

/// Lay a compact indicator output into a column of `len` positions, starting
/// at `offset`.  Positions outside the compact run stay `None`.
pub(crate) fn place(compact: &[f64], offset: usize, len: usize) -> Vec<Option<f64>> {
    let mut column = vec![None; len];
    for (i, &value) in compact.iter().enumerate() {
        if let Some(slot) = column.get_mut(offset + i) {
            *slot = Some(value);
        }
    }
    column
}

/// Derived columns for one series.  Every column has exactly `len` positions.
#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    len: usize,
    pub rsi: Vec<Option<f64>>,
    pub macd: Vec<Option<f64>>,
    pub macd_signal: Vec<Option<f64>>,
    pub macd_histogram: Vec<Option<f64>>,
    pub sma_short: Vec<Option<f64>>,
    pub sma_long: Vec<Option<f64>>,
}

impl IndicatorFrame {
    /// Compute every column for `series`.  Series shorter than a window yield
    /// all-`None` columns rather than an error.
    pub fn compute(series: &Series, params: &StrategyParams) -> Self {
        let closes = series.closes();
        let macd = macd::macd_columns(&closes, params.macd_fast, params.macd_slow, params.macd_signal);

        Self {
            len: closes.len(),
            rsi: rsi::rsi_column(&closes, params.rsi_period),
            macd: macd.macd,
            macd_signal: macd.signal,
            macd_histogram: macd.histogram,
            sma_short: sma::sma_column(&closes, params.sma_short),
            sma_long: sma::sma_column(&closes, params.sma_long),
        }
    }

    /// Close plus every indicator value at bar `index`.
    ///
    /// Returns `None` when `index` is out of range.
    pub fn snapshot(&self, series: &Series, index: usize) -> Option<IndicatorSnapshot> {
        if index >= self.len {
            return None;
        }
        let bar = series.bars().get(index)?;

        Some(IndicatorSnapshot {
            close: bar.close,
            rsi: self.rsi[index],
            macd: self.macd[index],
            macd_signal: self.macd_signal[index],
            macd_histogram: self.macd_histogram[index],
            sma_short: self.sma_short[index],
            sma_long: self.sma_long[index],
        })
    }
}

/// One enriched row: the close and each indicator value at that bar.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct IndicatorSnapshot {
    pub close: f64,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
}
