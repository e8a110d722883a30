// =============================================================================
// Trendgate — Main Entry Point
// =============================================================================
//
// Performs exactly one signal run and exits.  Scheduling (hourly cron, CI
// workflow, ...) lives outside the process; a failed run exits non-zero so the
// scheduler can see it.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod decision_envelope;
mod error;
mod indicators;
mod market_data;
mod report;
mod runner;
mod runtime_config;
mod strategy;
mod types;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::market_data::{FileProvider, MarketDataProvider, YahooChartProvider};
use crate::report::StdoutSink;
use crate::runtime_config::{ProviderKind, RunConfig};

const DEFAULT_CONFIG_PATH: &str = "trendgate.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & logging ─────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(started_at = %chrono::Utc::now().to_rfc3339(), "trendgate run starting");

    // ── 2. Config ────────────────────────────────────────────────────────
    let config_path =
        std::env::var("TRENDGATE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());

    let mut config = RunConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RunConfig::default()
    });
    config.apply_overrides(|key| std::env::var(key).ok())?;
    config.validate()?;

    info!(
        symbol = %config.symbol,
        interval = %config.interval,
        lookback = %config.lookback,
        provider = ?config.provider,
        "run configured"
    );

    // ── 3. Collaborators ─────────────────────────────────────────────────
    let provider: Box<dyn MarketDataProvider> = match config.provider {
        ProviderKind::Yahoo => Box::new(YahooChartProvider::new()?),
        ProviderKind::File => {
            let path = config
                .data_file
                .clone()
                .ok_or_else(|| anyhow::anyhow!("the file provider needs data_file"))?;
            Box::new(FileProvider::new(path))
        }
    };
    let sink = StdoutSink;

    // ── 4. Run ───────────────────────────────────────────────────────────
    match runner::run_once(&config, provider.as_ref(), &sink).await {
        Ok(envelope) => {
            info!(id = %envelope.id, action = %envelope.action, "run complete");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "run failed, no decision emitted");
            Err(e.into())
        }
    }
}
