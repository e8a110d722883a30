// =============================================================================
// Decision Envelope — the single artifact a run hands to its report sink
// =============================================================================
//
// Carries the decision, the bar it was made on, and the indicator row behind
// it so the outcome can be audited after the fact.
// =============================================================================

use serde::Serialize;

use crate::indicators::IndicatorSnapshot;
use crate::market_data::Series;
use crate::strategy::{Conditions, Decision, DecisionBasis};
use crate::types::{Action, Interval};

#[derive(Debug, Clone, Serialize)]
pub struct DecisionEnvelope {
    /// Unique identifier for this decision (UUID v4).
    pub id: String,

    /// Asset the decision pertains to.
    pub symbol: String,

    pub interval: Interval,

    /// RFC 3339 timestamp of the latest bar.
    pub bar_time: String,

    /// Close of the latest bar.
    pub reference_price: f64,

    pub action: Action,

    pub basis: DecisionBasis,

    /// Human-readable justification.
    pub reason: String,

    /// Indicator values on the latest bar.
    pub indicators: IndicatorSnapshot,

    /// Rule inputs; absent while indicators are warming up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Conditions>,

    /// ISO 8601 timestamp of when this envelope was created.
    pub created_at: String,
}

impl DecisionEnvelope {
    pub fn new(series: &Series, decision: &Decision, indicators: IndicatorSnapshot) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            symbol: series.symbol().to_string(),
            interval: series.interval(),
            bar_time: series.latest().timestamp.to_rfc3339(),
            reference_price: decision.reference_price,
            action: decision.action,
            basis: decision.basis,
            reason: decision.reason.to_string(),
            indicators,
            conditions: decision.conditions,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
