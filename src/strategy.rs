// =============================================================================
// Signal Decision Engine — Trend-Filtered RSI / MACD Crossover
// =============================================================================
//
// Maps the two most recent enriched bars to BUY / SELL / HOLD.
//
// Rule (first match wins):
//   1. BUY  — close > SMA_long
//             AND MACD crossed above its signal on this bar
//                 (latest MACD > signal, previous MACD <= signal)
//             AND RSI rising (latest > previous)
//             AND RSI < overbought (70)
//   2. SELL — close < SMA_long
//             AND MACD < signal (state, no crossover needed)
//             AND RSI > sell floor (50)
//   3. HOLD
//
// BUY waits for a crossover event while SELL only needs the bearish state:
// conservative entry, faster exit.  Keep the asymmetry.
//
// BUY and SELL can never both hold: one needs close above the long SMA, the
// other close below it.
//
// If the latest bar lacks RSI, MACD, MACD signal or the long SMA the engine
// returns HOLD with `DecisionBasis::InsufficientHistory`.  A missing value on
// the previous bar makes the comparisons that need it false.
// =============================================================================

use serde::Serialize;
use tracing::debug;

use crate::indicators::{IndicatorFrame, IndicatorSnapshot};
use crate::market_data::Series;
use crate::runtime_config::StrategyParams;
use crate::types::Action;

pub const BUY_REASON: &str =
    "confirmed uptrend (close > long SMA), MACD bullish crossover, RSI rising and not overbought";
pub const SELL_REASON: &str =
    "confirmed downtrend (close < long SMA), MACD below signal, RSI not yet oversold";
pub const HOLD_REASON: &str = "awaiting clearer trend or momentum signal";
pub const INSUFFICIENT_HISTORY_REASON: &str = "insufficient indicator history";

/// Why a decision came out the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionBasis {
    /// The BUY or SELL rule matched.
    Signal,
    /// All inputs were defined but neither rule matched.
    NoSignal,
    /// The latest bar is still inside an indicator warm-up window.
    InsufficientHistory,
}

/// Each rule input, evaluated on (latest, previous).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Conditions {
    pub uptrend: bool,
    pub macd_bullish_cross: bool,
    pub rsi_rising: bool,
    pub rsi_below_overbought: bool,
    pub downtrend: bool,
    pub macd_bearish: bool,
    pub rsi_above_sell_floor: bool,
}

impl Conditions {
    pub fn buy(&self) -> bool {
        self.uptrend && self.macd_bullish_cross && self.rsi_rising && self.rsi_below_overbought
    }

    pub fn sell(&self) -> bool {
        self.downtrend && self.macd_bearish && self.rsi_above_sell_floor
    }
}

/// Outcome of one run.  Built once and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub action: Action,
    pub reference_price: f64,
    pub basis: DecisionBasis,
    pub reason: &'static str,
    /// `None` when the rule could not be evaluated.
    pub conditions: Option<Conditions>,
}

/// Latest-bar decision plus the row it was made from.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub decision: Decision,
    pub latest: IndicatorSnapshot,
}

/// True when MACD moved from at-or-below its signal to above it between
/// `previous` and `latest`.
pub fn bullish_crossover(latest: &IndicatorSnapshot, previous: &IndicatorSnapshot) -> bool {
    match (latest.macd, latest.macd_signal, previous.macd, previous.macd_signal) {
        (Some(m), Some(s), Some(pm), Some(ps)) => m > s && pm <= ps,
        _ => false,
    }
}

pub struct SignalEngine;

impl SignalEngine {
    /// Decide on the latest bar.  Pure: no state survives between calls.
    pub fn decide(
        latest: &IndicatorSnapshot,
        previous: &IndicatorSnapshot,
        params: &StrategyParams,
    ) -> Decision {
        let reference_price = latest.close;

        let (Some(rsi), Some(macd), Some(signal), Some(sma_long)) =
            (latest.rsi, latest.macd, latest.macd_signal, latest.sma_long)
        else {
            return Decision {
                action: Action::Hold,
                reference_price,
                basis: DecisionBasis::InsufficientHistory,
                reason: INSUFFICIENT_HISTORY_REASON,
                conditions: None,
            };
        };

        let conditions = Conditions {
            uptrend: latest.close > sma_long,
            macd_bullish_cross: bullish_crossover(latest, previous),
            rsi_rising: previous.rsi.is_some_and(|prev| rsi > prev),
            rsi_below_overbought: rsi < params.rsi_overbought,
            downtrend: latest.close < sma_long,
            macd_bearish: macd < signal,
            rsi_above_sell_floor: rsi > params.rsi_sell_floor,
        };

        let (action, basis, reason) = if conditions.buy() {
            (Action::Buy, DecisionBasis::Signal, BUY_REASON)
        } else if conditions.sell() {
            (Action::Sell, DecisionBasis::Signal, SELL_REASON)
        } else {
            (Action::Hold, DecisionBasis::NoSignal, HOLD_REASON)
        };

        debug!(
            action = %action,
            close = latest.close,
            rsi,
            macd,
            signal,
            sma_long,
            ?conditions,
            "decision rule evaluated"
        );

        Decision {
            action,
            reference_price,
            basis,
            reason,
            conditions: Some(conditions),
        }
    }

    /// Compute indicators for `series` and decide on its last two bars.
    pub fn evaluate(series: &Series, params: &StrategyParams) -> Option<Evaluation> {
        let frame = IndicatorFrame::compute(series, params);
        let last = series.len().checked_sub(1)?;
        let latest = frame.snapshot(series, last)?;
        let previous = frame.snapshot(series, last.checked_sub(1)?)?;

        Some(Evaluation {
            decision: Self::decide(&latest, &previous, params),
            latest,
        })
    }
}
