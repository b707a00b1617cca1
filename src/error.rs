// =============================================================================
// Analysis error kinds
// =============================================================================
//
// Every failure the engine layer can produce is a typed variant carrying the
// ticker or parameter context needed to report it to the user.  Per-ticker
// failures inside a multi-ticker request are recovered by the orchestrator
// (the ticker is skipped and the failure recorded); parameter and overlap
// errors abort the whole analysis call.
// =============================================================================

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A ticker resolved to zero bars (invalid symbol, or no trading days in
    /// the requested range).
    #[error("{ticker}: series contains no bars")]
    EmptySeries { ticker: String },

    /// A request parameter failed validation before any work was done.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Normalization could not establish a usable baseline for a ticker.
    #[error("{ticker}: not enough data to normalize")]
    InsufficientData { ticker: String },

    /// The date intersection across all input series is too small to
    /// correlate.
    #[error("only {overlap} common date(s) across all series, need at least 2")]
    InsufficientOverlap { overlap: usize },

    /// The market-data provider failed for one ticker.
    #[error("{ticker}: fetch failed: {reason}")]
    Fetch { ticker: String, reason: String },

    /// Every requested ticker failed; the request produced nothing.
    #[error("no requested ticker produced any data")]
    NoData,

    /// Correlation requires at least two tickers with fetched data.
    #[error("correlation needs at least 2 tickers with data, got {succeeded}")]
    InsufficientTickers { succeeded: usize },
}
