// =============================================================================
// Run Configuration — per-invocation settings loaded from JSON + environment
// =============================================================================
//
// The config is read once at start-up and cloned into the run; nothing mutates
// it afterwards.  All fields carry serde defaults so a partial (or empty) JSON
// document is valid.
//
// Precedence: built-in defaults < JSON file < TRENDGATE_* environment vars.
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::{Interval, Lookback};

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_symbol() -> String {
    "GC=F".to_string()
}

fn default_rsi_period() -> usize {
    14
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_slow() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

fn default_sma_short() -> usize {
    50
}

fn default_sma_long() -> usize {
    200
}

fn default_rsi_overbought() -> f64 {
    70.0
}

fn default_rsi_sell_floor() -> f64 {
    50.0
}

// =============================================================================
// StrategyParams
// =============================================================================

/// Indicator windows and decision thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyParams {
    /// RSI lookback (Wilder smoothing).
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    /// Fast EMA length of the MACD line.
    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,

    /// Slow EMA length of the MACD line.
    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,

    /// EMA length of the MACD signal line.
    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,

    /// Short trend SMA.  Reported, not used by the decision rule.
    #[serde(default = "default_sma_short")]
    pub sma_short: usize,

    /// Long trend SMA used as the uptrend / downtrend filter.
    #[serde(default = "default_sma_long")]
    pub sma_long: usize,

    /// BUY requires RSI strictly below this.
    #[serde(default = "default_rsi_overbought")]
    pub rsi_overbought: f64,

    /// SELL requires RSI strictly above this.
    #[serde(default = "default_rsi_sell_floor")]
    pub rsi_sell_floor: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            rsi_period: default_rsi_period(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
            sma_short: default_sma_short(),
            sma_long: default_sma_long(),
            rsi_overbought: default_rsi_overbought(),
            rsi_sell_floor: default_rsi_sell_floor(),
        }
    }
}

// =============================================================================
// RunConfig
// =============================================================================

/// Which market data collaborator feeds the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Yahoo,
    File,
}

impl std::str::FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "yahoo" => Ok(Self::Yahoo),
            "file" => Ok(Self::File),
            other => anyhow::bail!("unknown provider '{other}'"),
        }
    }
}

/// Everything a single run needs to know.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Asset identifier as understood by the provider (e.g. `GC=F`).
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Bar duration.
    #[serde(default)]
    pub interval: Interval,

    /// History window requested per run.
    #[serde(default)]
    pub lookback: Lookback,

    #[serde(default)]
    pub provider: ProviderKind,

    /// Bars file for the `file` provider.
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    #[serde(default)]
    pub strategy_params: StrategyParams,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            interval: Interval::default(),
            lookback: Lookback::default(),
            provider: ProviderKind::default(),
            data_file: None,
            strategy_params: StrategyParams::default(),
        }
    }
}

impl RunConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// A missing file is an error; the caller decides whether to fall back to
    /// defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read run config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse run config from {}", path.display()))?;

        info!(
            path = %path.display(),
            symbol = %config.symbol,
            interval = %config.interval,
            lookback = %config.lookback,
            "run config loaded"
        );

        Ok(config)
    }

    /// Apply `TRENDGATE_*` overrides.  `lookup` is `std::env::var` in
    /// production.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(symbol) = lookup("TRENDGATE_SYMBOL") {
            self.symbol = symbol.trim().to_string();
        }
        if let Some(interval) = lookup("TRENDGATE_INTERVAL") {
            self.interval = interval.parse::<Interval>().context("TRENDGATE_INTERVAL")?;
        }
        if let Some(lookback) = lookup("TRENDGATE_LOOKBACK") {
            self.lookback = lookback.parse::<Lookback>().context("TRENDGATE_LOOKBACK")?;
        }
        if let Some(provider) = lookup("TRENDGATE_PROVIDER") {
            self.provider = provider.parse::<ProviderKind>().context("TRENDGATE_PROVIDER")?;
        }
        if let Some(path) = lookup("TRENDGATE_DATA_FILE") {
            self.data_file = Some(PathBuf::from(path));
        }
        Ok(())
    }

    /// Reject configurations that cannot produce a meaningful run.
    pub fn validate(&self) -> Result<()> {
        let p = &self.strategy_params;

        anyhow::ensure!(!self.symbol.is_empty(), "symbol must not be empty");
        anyhow::ensure!(
            p.rsi_period > 0
                && p.macd_fast > 0
                && p.macd_slow > 0
                && p.macd_signal > 0
                && p.sma_short > 0
                && p.sma_long > 0,
            "indicator periods must be positive"
        );
        anyhow::ensure!(
            p.macd_fast < p.macd_slow,
            "macd_fast ({}) must be shorter than macd_slow ({})",
            p.macd_fast,
            p.macd_slow
        );
        anyhow::ensure!(
            (0.0..=100.0).contains(&p.rsi_overbought) && (0.0..=100.0).contains(&p.rsi_sell_floor),
            "RSI thresholds must lie in [0, 100]"
        );
        if self.provider == ProviderKind::File {
            anyhow::ensure!(self.data_file.is_some(), "the file provider needs data_file");
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = RunConfig::default();
        assert_eq!(cfg.symbol, "GC=F");
        assert_eq!(cfg.interval, Interval::OneHour);
        assert_eq!(cfg.lookback, Lookback::OneMonth);
        assert_eq!(cfg.provider, ProviderKind::Yahoo);
        assert_eq!(cfg.strategy_params.rsi_period, 14);
        assert_eq!(cfg.strategy_params.macd_fast, 12);
        assert_eq!(cfg.strategy_params.macd_slow, 26);
        assert_eq!(cfg.strategy_params.macd_signal, 9);
        assert_eq!(cfg.strategy_params.sma_short, 50);
        assert_eq!(cfg.strategy_params.sma_long, 200);
        assert!((cfg.strategy_params.rsi_overbought - 70.0).abs() < f64::EPSILON);
        assert!((cfg.strategy_params.rsi_sell_floor - 50.0).abs() < f64::EPSILON);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: RunConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.symbol, "GC=F");
        assert_eq!(cfg.strategy_params, StrategyParams::default());
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "symbol": "SI=F", "interval": "15m", "strategy_params": { "sma_long": 100 } }"#;
        let cfg: RunConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.symbol, "SI=F");
        assert_eq!(cfg.interval, Interval::FifteenMinutes);
        assert_eq!(cfg.strategy_params.sma_long, 100);
        assert_eq!(cfg.strategy_params.rsi_period, 14);
    }

    #[test]
    fn env_overrides_win_over_file_values() {
        let vars: HashMap<&str, &str> = [
            ("TRENDGATE_SYMBOL", " BTC-USD "),
            ("TRENDGATE_INTERVAL", "1d"),
            ("TRENDGATE_LOOKBACK", "1y"),
            ("TRENDGATE_PROVIDER", "file"),
            ("TRENDGATE_DATA_FILE", "/tmp/bars.json"),
        ]
        .into_iter()
        .collect();

        let mut cfg = RunConfig::default();
        cfg.apply_overrides(|k| vars.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(cfg.symbol, "BTC-USD");
        assert_eq!(cfg.interval, Interval::OneDay);
        assert_eq!(cfg.lookback, Lookback::OneYear);
        assert_eq!(cfg.provider, ProviderKind::File);
        assert_eq!(cfg.data_file, Some(PathBuf::from("/tmp/bars.json")));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn bad_override_is_reported() {
        let mut cfg = RunConfig::default();
        let err = cfg
            .apply_overrides(|k| (k == "TRENDGATE_INTERVAL").then(|| "7h".to_string()))
            .unwrap_err();
        assert!(format!("{err:#}").contains("TRENDGATE_INTERVAL"));
    }

    #[test]
    fn validate_rejects_inverted_macd_periods() {
        let mut cfg = RunConfig::default();
        cfg.strategy_params.macd_fast = 26;
        cfg.strategy_params.macd_slow = 12;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_period() {
        let mut cfg = RunConfig::default();
        cfg.strategy_params.rsi_period = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn file_provider_requires_path() {
        let cfg = RunConfig {
            provider: ProviderKind::File,
            ..RunConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
