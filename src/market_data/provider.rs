// =============================================================================
// Market data provider contract
// =============================================================================
//
// Providers only fetch and decode.  Ordering, duplicates and price sanity are
// checked by `Series::new`, so a provider may hand back whatever the upstream
// feed returned.
// =============================================================================

use anyhow::Result;
use async_trait::async_trait;

use crate::types::{Interval, Lookback};

use super::Bar;

/// Parameters for a single history request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarRequest {
    pub symbol: String,
    pub interval: Interval,
    pub lookback: Lookback,
}

/// A source of OHLC history, e.g. a REST feed or a file on disk.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Fetch bars for `request`, oldest first.
    async fn fetch_bars(&self, request: &BarRequest) -> Result<Vec<Bar>>;
}
