// =============================================================================
// File provider — replay bars from a JSON document on disk
// =============================================================================
//
// Expected format: a JSON array of bars, oldest first.
//
//   [ { "timestamp": "2024-01-01T00:00:00Z",
//       "open": 2061.1, "high": 2064.0, "low": 2059.8, "close": 2062.4 }, ... ]
//
// The file is read in full on every fetch; the request's symbol, interval and
// lookback are informational only.
// =============================================================================

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, instrument};

use super::provider::{BarRequest, MarketDataProvider};
use super::Bar;

#[derive(Debug, Clone)]
pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MarketDataProvider for FileProvider {
    fn name(&self) -> &'static str {
        "file"
    }

    #[instrument(skip(self), name = "file::fetch_bars")]
    async fn fetch_bars(&self, request: &BarRequest) -> Result<Vec<Bar>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read bars from {}", self.path.display()))?;

        let bars = parse_bars(&content)
            .with_context(|| format!("failed to parse bars from {}", self.path.display()))?;

        debug!(
            symbol = %request.symbol,
            path = %self.path.display(),
            count = bars.len(),
            "bars loaded from file"
        );
        Ok(bars)
    }
}

fn parse_bars(content: &str) -> Result<Vec<Bar>> {
    let bars: Vec<Bar> = serde_json::from_str(content)?;
    Ok(bars)
}
