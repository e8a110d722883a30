// =============================================================================
// Yahoo Finance chart client — public OHLC history over REST
// =============================================================================
//
// GET /v8/finance/chart/{symbol}?interval=1h&range=1mo
//
// Response shape (abridged):
//   { "chart": { "result": [ {
//       "timestamp": [1700000000, ...],
//       "indicators": {
//         "quote":    [ { "open": [..], "high": [..], "low": [..], "close": [..] } ],
//         "adjclose": [ { "adjclose": [..] } ]          // daily+ intervals only
//       } } ],
//     "error": null } }
//
// Price arrays contain `null` for bars the exchange did not print; those rows
// are dropped.  When `adjclose` is present every OHLC field is scaled by
// adjclose / close so the series is split/dividend adjusted.
// =============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, instrument, warn};

use super::provider::{BarRequest, MarketDataProvider};
use super::Bar;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// The chart endpoint rejects requests without a browser-like agent.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) trendgate/1.0";

#[derive(Clone)]
pub struct YahooChartProvider {
    base_url: String,
    client: reqwest::Client,
}

impl YahooChartProvider {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the client at a different host (proxies, mirrors).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("failed to build reqwest client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, "YahooChartProvider initialised");

        Ok(Self { base_url, client })
    }
}

#[async_trait]
impl MarketDataProvider for YahooChartProvider {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    #[instrument(skip(self), name = "yahoo::fetch_bars")]
    async fn fetch_bars(&self, request: &BarRequest) -> Result<Vec<Bar>> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, request.symbol);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("interval", request.interval.as_str()),
                ("range", request.lookback.as_str()),
            ])
            .send()
            .await
            .context("GET /v8/finance/chart request failed")?;

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse chart response")?;

        if !status.is_success() {
            anyhow::bail!("Yahoo GET /v8/finance/chart returned {}: {}", status, body);
        }

        let bars = parse_chart(&body)?;
        debug!(
            symbol = %request.symbol,
            interval = %request.interval,
            count = bars.len(),
            "chart bars fetched"
        );
        Ok(bars)
    }
}

impl std::fmt::Debug for YahooChartProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooChartProvider")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Decode a chart response body into bars, oldest first.
pub fn parse_chart(body: &serde_json::Value) -> Result<Vec<Bar>> {
    let chart = &body["chart"];

    if let Some(err) = chart.get("error").filter(|e| !e.is_null()) {
        let code = err["code"].as_str().unwrap_or("unknown");
        let description = err["description"].as_str().unwrap_or("");
        anyhow::bail!("chart error {code}: {description}");
    }

    let result = chart["result"]
        .as_array()
        .and_then(|arr| arr.first())
        .context("chart response has no result")?;

    // A valid symbol outside trading hours may carry no timestamps at all.
    let Some(timestamps) = result["timestamp"].as_array() else {
        return Ok(Vec::new());
    };

    let quote = &result["indicators"]["quote"][0];
    let opens = price_column(quote, "open")?;
    let highs = price_column(quote, "high")?;
    let lows = price_column(quote, "low")?;
    let closes = price_column(quote, "close")?;
    let adjcloses = result["indicators"]["adjclose"][0]["adjclose"].as_array();

    let mut bars = Vec::with_capacity(timestamps.len());
    let mut skipped = 0usize;

    for (i, ts) in timestamps.iter().enumerate() {
        let secs = ts
            .as_i64()
            .with_context(|| format!("timestamp[{i}] is not an integer"))?;
        let timestamp = DateTime::<Utc>::from_timestamp(secs, 0)
            .with_context(|| format!("timestamp[{i}] out of range: {secs}"))?;

        let row = (
            cell(opens, i),
            cell(highs, i),
            cell(lows, i),
            cell(closes, i),
        );
        let (Some(open), Some(high), Some(low), Some(close)) = row else {
            skipped += 1;
            continue;
        };

        let scale = adjcloses
            .and_then(|col| cell(col, i))
            .filter(|_| close != 0.0)
            .map_or(1.0, |adj| adj / close);

        bars.push(Bar::new(
            timestamp,
            open * scale,
            high * scale,
            low * scale,
            close * scale,
        ));
    }

    if skipped > 0 {
        warn!(skipped, kept = bars.len(), "dropped chart rows with null prices");
    }

    Ok(bars)
}

fn price_column<'a>(quote: &'a serde_json::Value, name: &str) -> Result<&'a Vec<serde_json::Value>> {
    quote[name]
        .as_array()
        .with_context(|| format!("chart quote is missing the {name} column"))
}

fn cell(column: &[serde_json::Value], i: usize) -> Option<f64> {
    column.get(i).and_then(serde_json::Value::as_f64)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_quote_rows() {
        let body = json!({
            "chart": {
                "result": [{
                    "timestamp": [1700000000, 1700003600],
                    "indicators": {
                        "quote": [{
                            "open": [1990.5, 1992.0],
                            "high": [1995.0, 1996.5],
                            "low": [1988.0, 1991.0],
                            "close": [1992.0, 1994.25]
                        }]
                    }
                }],
                "error": null
            }
        });

        let bars = parse_chart(&body).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].timestamp.timestamp(), 1_700_000_000);
        assert!((bars[1].close - 1994.25).abs() < 1e-10);
        assert!((bars[1].low - 1991.0).abs() < 1e-10);
    }

    #[test]
    fn skips_rows_with_null_prices() {
        let body = json!({
            "chart": {
                "result": [{
                    "timestamp": [1, 2, 3],
                    "indicators": {
                        "quote": [{
                            "open": [10.0, null, 12.0],
                            "high": [10.5, 11.5, 12.5],
                            "low": [9.5, 10.5, 11.5],
                            "close": [10.0, 11.0, null]
                        }]
                    }
                }],
                "error": null
            }
        });

        let bars = parse_chart(&body).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].timestamp.timestamp(), 1);
    }

    #[test]
    fn applies_adjclose_scaling() {
        let body = json!({
            "chart": {
                "result": [{
                    "timestamp": [86400],
                    "indicators": {
                        "quote": [{
                            "open": [100.0],
                            "high": [110.0],
                            "low": [90.0],
                            "close": [100.0]
                        }],
                        "adjclose": [{ "adjclose": [50.0] }]
                    }
                }],
                "error": null
            }
        });

        let bars = parse_chart(&body).unwrap();
        assert!((bars[0].open - 50.0).abs() < 1e-10);
        assert!((bars[0].high - 55.0).abs() < 1e-10);
        assert!((bars[0].low - 45.0).abs() < 1e-10);
        assert!((bars[0].close - 50.0).abs() < 1e-10);
    }

    #[test]
    fn surfaces_chart_error() {
        let body = json!({
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
            }
        });

        let err = parse_chart(&body).unwrap_err();
        assert!(err.to_string().contains("Not Found"));
    }

    #[test]
    fn missing_timestamps_yield_no_bars() {
        let body = json!({
            "chart": {
                "result": [{ "indicators": { "quote": [{}] } }],
                "error": null
            }
        });

        assert!(parse_chart(&body).unwrap().is_empty());
    }
}
