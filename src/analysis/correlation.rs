// =============================================================================
// Correlation Engine — Pearson matrix over the common date range
// =============================================================================
//
// Aligns all input series on the intersection of their trading dates (an
// inner join — a date survives only if every ticker traded on it), extracts
// each ticker's close vector on that aligned set, and computes the Pearson
// coefficient for every unordered pair.
//
//   r = cov(x, y) / (σ_x · σ_y)
//
// The matrix is filled symmetrically with 1.0 on the diagonal.  A pair with
// zero variance on the aligned window has no measurable linear relationship
// and contributes 0.0 off the diagonal.
// =============================================================================

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::market_data::series::{CorrelationMatrix, TimeSeries};

/// Compute the pairwise correlation matrix for two or more series.
///
/// Labels preserve the input order of `series`.
///
/// # Errors
/// - `InvalidParameter` for fewer than 2 input series.
/// - `InsufficientOverlap` when the date intersection has fewer than 2 days.
pub fn correlation_matrix(series: &[TimeSeries]) -> Result<CorrelationMatrix> {
    if series.len() < 2 {
        return Err(AnalysisError::InvalidParameter(format!(
            "correlation needs at least 2 tickers, got {}",
            series.len()
        )));
    }

    // --- Inner join on dates -------------------------------------------------
    let mut common: BTreeSet<NaiveDate> = series[0].dates().into_iter().collect();
    for s in &series[1..] {
        let dates: BTreeSet<NaiveDate> = s.dates().into_iter().collect();
        common = common.intersection(&dates).copied().collect();
    }

    if common.len() < 2 {
        return Err(AnalysisError::InsufficientOverlap {
            overlap: common.len(),
        });
    }

    debug!(
        tickers = series.len(),
        overlap = common.len(),
        "correlating on aligned date set"
    );

    // --- Aligned close vectors ----------------------------------------------
    // Every date in `common` is present in every series by construction, so
    // the lookups cannot miss.
    let aligned: Vec<Vec<f64>> = series
        .iter()
        .map(|s| common.iter().filter_map(|&d| s.close_on(d)).collect())
        .collect();

    // --- Pairwise Pearson fill ----------------------------------------------
    let n = series.len();
    let mut values = vec![vec![0.0_f64; n]; n];

    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let r = pearson(&aligned[i], &aligned[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    let labels = series.iter().map(|s| s.ticker().to_string()).collect();
    Ok(CorrelationMatrix::new(labels, values))
}

/// Pearson correlation coefficient of two equal-length vectors.
///
/// Returns 0.0 when either vector has zero variance (degenerate pair); the
/// result is clamped to [-1, 1] to absorb floating-point drift.
fn pearson(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    let n = x.len() as f64;

    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&a, &b) in x.iter().zip(y.iter()) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom < f64::EPSILON {
        return 0.0;
    }

    (cov / denom).clamp(-1.0, 1.0)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::series::Bar;

    fn series_on(ticker: &str, days: &[u32], closes: &[f64]) -> TimeSeries {
        let bars = days
            .iter()
            .zip(closes)
            .map(|(&d, &close)| Bar {
                date: NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 0.0,
            })
            .collect();
        TimeSeries::new(ticker, bars).unwrap()
    }

    fn series(ticker: &str, closes: &[f64]) -> TimeSeries {
        let days: Vec<u32> = (2..2 + closes.len() as u32).collect();
        series_on(ticker, &days, closes)
    }

    // ---- correlation_matrix ----------------------------------------------

    #[test]
    fn perfectly_inverse_pair_is_minus_one() {
        // [100,105,110] vs [50,47,44] over the same 3 dates => r = -1.
        let m = correlation_matrix(&[
            series("UP", &[100.0, 105.0, 110.0]),
            series("DOWN", &[50.0, 47.0, 44.0]),
        ])
        .unwrap();
        assert!((m.get("UP", "DOWN").unwrap() + 1.0).abs() < 1e-10);
    }

    #[test]
    fn identical_movement_is_plus_one() {
        let m = correlation_matrix(&[
            series("A", &[1.0, 2.0, 3.0, 4.0]),
            series("B", &[10.0, 20.0, 30.0, 40.0]),
        ])
        .unwrap();
        assert!((m.get("A", "B").unwrap() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let m = correlation_matrix(&[
            series("A", &[1.0, 3.0, 2.0, 5.0, 4.0]),
            series("B", &[2.0, 1.0, 4.0, 3.0, 6.0]),
            series("C", &[5.0, 4.0, 4.5, 2.0, 3.0]),
        ])
        .unwrap();

        let v = m.values();
        for i in 0..3 {
            assert_eq!(v[i][i], 1.0);
            for j in 0..3 {
                assert_eq!(v[i][j], v[j][i]);
                assert!((-1.0..=1.0).contains(&v[i][j]));
            }
        }
    }

    #[test]
    fn alignment_uses_only_common_dates() {
        // A trades on days 2,3,4,5; B on days 3,4,5,8.  On the common days
        // {3,4,5} the two move identically => r = 1.
        let a = series_on("A", &[2, 3, 4, 5], &[999.0, 1.0, 2.0, 3.0]);
        let b = series_on("B", &[3, 4, 5, 8], &[10.0, 20.0, 30.0, 5.0]);
        let m = correlation_matrix(&[a, b]).unwrap();
        assert!((m.get("A", "B").unwrap() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn one_ticker_is_invalid() {
        let err = correlation_matrix(&[series("A", &[1.0, 2.0])]).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidParameter(_)));
    }

    #[test]
    fn disjoint_dates_are_insufficient_overlap() {
        let a = series_on("A", &[2, 3], &[1.0, 2.0]);
        let b = series_on("B", &[8, 9], &[1.0, 2.0]);
        let err = correlation_matrix(&[a, b]).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientOverlap { overlap: 0 }));
    }

    #[test]
    fn single_common_date_is_insufficient_overlap() {
        let a = series_on("A", &[2, 3], &[1.0, 2.0]);
        let b = series_on("B", &[3, 9], &[1.0, 2.0]);
        let err = correlation_matrix(&[a, b]).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientOverlap { overlap: 1 }));
    }

    #[test]
    fn flat_series_contributes_zero_off_diagonal() {
        let m = correlation_matrix(&[
            series("FLAT", &[5.0, 5.0, 5.0]),
            series("MOVE", &[1.0, 2.0, 3.0]),
        ])
        .unwrap();
        assert_eq!(m.get("FLAT", "MOVE"), Some(0.0));
        assert_eq!(m.get("FLAT", "FLAT"), Some(1.0));
    }

    #[test]
    fn labels_preserve_input_order() {
        let m = correlation_matrix(&[
            series("ZZZ", &[1.0, 2.0]),
            series("AAA", &[2.0, 1.0]),
        ])
        .unwrap();
        assert_eq!(m.labels(), &["ZZZ".to_string(), "AAA".to_string()]);
    }

    // ---- pearson -----------------------------------------------------------

    #[test]
    fn pearson_known_value() {
        // Noisy-but-rising pair stays strongly positive.
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = [1.1, 1.9, 3.2, 3.8, 5.3, 5.9];
        let r = pearson(&x, &y);
        assert!(r > 0.99, "expected near-1 correlation, got {r}");
    }
}
