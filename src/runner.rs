// =============================================================================
// Run Orchestrator — fetch -> validate -> enrich -> decide -> report
// =============================================================================
//
// One call is one run.  The run owns its series and indicator frame and drops
// them on return; nothing is shared or cached across runs.  Fetch and
// validation failures are terminal and are never retried here.
// =============================================================================

use tracing::{debug, info, warn};

use crate::decision_envelope::DecisionEnvelope;
use crate::error::RunError;
use crate::market_data::{BarRequest, MarketDataProvider, Series};
use crate::report::ReportSink;
use crate::runtime_config::RunConfig;
use crate::strategy::SignalEngine;

/// Execute a single run and return the envelope that was reported.
pub async fn run_once<P, S>(
    config: &RunConfig,
    provider: &P,
    sink: &S,
) -> Result<DecisionEnvelope, RunError>
where
    P: MarketDataProvider + ?Sized,
    S: ReportSink + ?Sized,
{
    let request = BarRequest {
        symbol: config.symbol.clone(),
        interval: config.interval,
        lookback: config.lookback,
    };

    // ── 1. Fetch ─────────────────────────────────────────────────────────
    let bars = provider
        .fetch_bars(&request)
        .await
        .map_err(|e| RunError::DataUnavailable(format!("{e:#}")))?;

    info!(
        provider = provider.name(),
        symbol = %request.symbol,
        interval = %request.interval,
        lookback = %request.lookback,
        bars = bars.len(),
        latest_close = bars.last().map(|b| b.close),
        "market data fetched"
    );

    // ── 2. Validate ──────────────────────────────────────────────────────
    let series = Series::new(&config.symbol, config.interval, bars).map_err(|e| {
        warn!(error = %e, "series rejected");
        RunError::from(e)
    })?;

    // ── 3. Enrich + decide ───────────────────────────────────────────────
    let evaluation = SignalEngine::evaluate(&series, &config.strategy_params).ok_or(
        RunError::InsufficientData {
            bars: series.len(),
            required: crate::market_data::series::MIN_BARS,
        },
    )?;

    debug!(latest = ?evaluation.latest, "indicators computed");

    let envelope = DecisionEnvelope::new(&series, &evaluation.decision, evaluation.latest);

    info!(
        symbol = %envelope.symbol,
        action = %envelope.action,
        basis = ?envelope.basis,
        price = envelope.reference_price,
        reason = %envelope.reason,
        "decision made"
    );

    // ── 4. Report ────────────────────────────────────────────────────────
    sink.emit(&envelope)
        .map_err(|e| RunError::Report(format!("{e:#}")))?;

    Ok(envelope)
}
