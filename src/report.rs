// =============================================================================
// Report sinks — where a finished decision goes
// =============================================================================
//
// The core hands exactly one `DecisionEnvelope` per successful run to a sink.
// Delivery guarantees (idempotence, ordering across overlapping runs) are the
// sink's concern.
// =============================================================================

use std::io::Write;

use anyhow::{Context, Result};
use tracing::info;

use crate::decision_envelope::DecisionEnvelope;

pub trait ReportSink: Send + Sync {
    fn emit(&self, envelope: &DecisionEnvelope) -> Result<()>;
}

/// Writes the envelope as one JSON line on stdout and logs a readable
/// summary.  Logs go to stderr, so stdout stays machine-readable.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl ReportSink for StdoutSink {
    fn emit(&self, envelope: &DecisionEnvelope) -> Result<()> {
        let line = serde_json::to_string(envelope).context("failed to serialise decision")?;

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        writeln!(out, "{line}").context("failed to write decision to stdout")?;
        out.flush().context("failed to flush stdout")?;

        info!(
            asset = %envelope.symbol,
            time = %envelope.bar_time,
            price = %format!("{:.2}", envelope.reference_price),
            signal = %envelope.action,
            reason = %envelope.reason,
            "final action report"
        );
        Ok(())
    }
}
