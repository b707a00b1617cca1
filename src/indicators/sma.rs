// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// The SMA at index i is the unweighted mean of the `window` closes ending at
// i.  The first `window - 1` positions carry no value: there is no backward
// extrapolation and no padding with a shorter window.  A window larger than
// the series produces an entirely undefined series — usable range empty,
// not an error.
// =============================================================================

use std::collections::BTreeSet;

use tracing::trace;

use crate::error::{AnalysisError, Result};
use crate::market_data::series::{IndicatorSeries, TimeSeries};

/// Compute the date-aligned SMA values for `closes` and `window`.
///
/// The returned vector always has `closes.len()` entries; exactly
/// `max(len - window + 1, 0)` of them are defined.
///
/// # Edge cases
/// - `window == 0` => all `None` (callers validate; guarded anyway)
/// - `window > closes.len()` => all `None`
pub fn calculate_sma(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if window == 0 || window > closes.len() {
        trace!(window, len = closes.len(), "SMA: window exceeds usable range");
        return out;
    }

    for (i, chunk) in closes.windows(window).enumerate() {
        out[i + window - 1] = Some(chunk.iter().sum::<f64>() / window as f64);
    }

    out
}

/// Run the engine for one window size, producing an `IndicatorSeries` named
/// `SMA-{window}` aligned to the source series' dates.
///
/// # Errors
/// - `InvalidParameter` when `window == 0`.
pub fn sma_series(series: &TimeSeries, window: usize) -> Result<IndicatorSeries> {
    if window == 0 {
        return Err(AnalysisError::InvalidParameter(
            "moving-average window must be >= 1".to_string(),
        ));
    }

    let values = calculate_sma(&series.closes(), window);
    Ok(IndicatorSeries::from_values(
        series,
        format!("SMA-{window}"),
        values,
    ))
}

/// Run the engine for a set of window sizes, deduplicated and ascending.
pub fn sma_bundle(series: &TimeSeries, windows: &[usize]) -> Result<Vec<IndicatorSeries>> {
    let unique: BTreeSet<usize> = windows.iter().copied().collect();
    unique.iter().map(|&w| sma_series(series, w)).collect()
}
