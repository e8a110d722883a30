// =============================================================================
// Series Store — validated, time-ordered bars for a single run
// =============================================================================
//
// A `Series` can only be built through `Series::new`, which rejects every
// shape the indicator engine cannot trust:
//
//   * empty input, or fewer than two bars (the decision rule needs both the
//     latest and the previous bar),
//   * duplicate or backwards timestamps,
//   * non-finite or non-positive prices.
//
// Once built the bars are never mutated.  Derived columns live in a separate
// `IndicatorFrame` aligned by position.
// =============================================================================

use crate::error::SeriesError;
use crate::types::Interval;

use super::Bar;

/// Minimum bars required to evaluate the decision rule.
pub const MIN_BARS: usize = 2;

/// Validated OHLC series owned exclusively by one run.
#[derive(Debug, Clone)]
pub struct Series {
    symbol: String,
    interval: Interval,
    bars: Vec<Bar>,
}

impl Series {
    /// Validate `bars` and take ownership of them.
    pub fn new(
        symbol: impl Into<String>,
        interval: Interval,
        bars: Vec<Bar>,
    ) -> Result<Self, SeriesError> {
        if bars.is_empty() {
            return Err(SeriesError::Empty);
        }
        if bars.len() < MIN_BARS {
            return Err(SeriesError::TooShort {
                bars: bars.len(),
                required: MIN_BARS,
            });
        }

        for (index, bar) in bars.iter().enumerate() {
            for (field, price) in bar.prices() {
                if !price.is_finite() {
                    return Err(SeriesError::NonFinitePrice { index, field });
                }
                if price <= 0.0 {
                    return Err(SeriesError::NonPositivePrice { index, field });
                }
            }
        }

        for (offset, pair) in bars.windows(2).enumerate() {
            let index = offset + 1;
            if pair[1].timestamp == pair[0].timestamp {
                return Err(SeriesError::DuplicateTimestamp { index });
            }
            if pair[1].timestamp < pair[0].timestamp {
                return Err(SeriesError::NonMonotonicTimestamp { index });
            }
        }

        Ok(Self {
            symbol: symbol.into(),
            interval,
            bars,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Close prices in bar order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Most recent bar.  A validated series always has at least two.
    pub fn latest(&self) -> &Bar {
        &self.bars[self.bars.len() - 1]
    }
}
