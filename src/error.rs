// =============================================================================
// Error taxonomy for a single signal run
// =============================================================================
//
// Only terminal failures live here.  Insufficient indicator warm-up is not an
// error; it surfaces as a HOLD decision.
// =============================================================================

use thiserror::Error;

/// Why a raw bar series was rejected before indicator computation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("series is empty")]
    Empty,

    #[error("series has {bars} bar(s), at least {required} required")]
    TooShort { bars: usize, required: usize },

    #[error("bar {index} is timestamped before its predecessor")]
    NonMonotonicTimestamp { index: usize },

    #[error("bar {index} repeats its predecessor's timestamp")]
    DuplicateTimestamp { index: usize },

    #[error("bar {index} has a non-finite {field} price")]
    NonFinitePrice { index: usize, field: &'static str },

    #[error("bar {index} has a non-positive {field} price")]
    NonPositivePrice { index: usize, field: &'static str },
}

/// Terminal failure of a run.  No decision is emitted when one of these is
/// returned.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("market data unavailable: {0}")]
    DataUnavailable(String),

    #[error("insufficient data: {bars} bar(s) received, {required} required")]
    InsufficientData { bars: usize, required: usize },

    #[error("malformed series: {0}")]
    MalformedSeries(#[source] SeriesError),

    #[error("report sink failed: {0}")]
    Report(String),
}

impl From<SeriesError> for RunError {
    fn from(err: SeriesError) -> Self {
        match err {
            SeriesError::Empty => Self::DataUnavailable("provider returned no bars".to_string()),
            SeriesError::TooShort { bars, required } => Self::InsufficientData { bars, required },
            other => Self::MalformedSeries(other),
        }
    }
}
