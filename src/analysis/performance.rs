// =============================================================================
// Performance Normalizer
// =============================================================================
//
// Rebases each close-price series so its first in-range value is exactly 100,
// making percentage growth directly comparable across tickers.
//
//   index(d) = 100 * close(d) / close(first_date)
//
// Tickers are normalized independently: a ticker with a shorter available
// history still starts at 100 on its own first date.  Dates are not required
// to match across tickers.
// =============================================================================

use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::market_data::series::{NormalizedPoint, NormalizedSeries, TimeSeries};

/// Normalize a single series to a baseline of 100 at its first close.
///
/// # Errors
/// - `InsufficientData` when the series has no bars or its first close is
///   not a usable baseline (zero or non-finite — division would poison the
///   whole series).
pub fn normalize(series: &TimeSeries) -> Result<NormalizedSeries> {
    if series.is_empty() {
        return Err(AnalysisError::InsufficientData {
            ticker: series.ticker().to_string(),
        });
    }

    let baseline = series.first_close();
    if baseline == 0.0 || !baseline.is_finite() {
        debug!(ticker = %series.ticker(), baseline, "unusable normalization baseline");
        return Err(AnalysisError::InsufficientData {
            ticker: series.ticker().to_string(),
        });
    }

    let points = series
        .bars()
        .iter()
        .map(|bar| NormalizedPoint {
            date: bar.date,
            index: 100.0 * bar.close / baseline,
        })
        .collect();

    Ok(NormalizedSeries {
        ticker: series.ticker().to_string(),
        points,
    })
}

/// Normalize every series in the slice, preserving input order.
///
/// Fails on the first unusable series; the orchestrator applies its
/// per-ticker recovery policy by calling [`normalize`] per series instead
/// when partial results are acceptable.
pub fn normalize_all(series: &[TimeSeries]) -> Result<Vec<NormalizedSeries>> {
    series.iter().map(normalize).collect()
}
