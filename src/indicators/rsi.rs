// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Compute price changes (deltas) from consecutive closes.
// Step 2 — Seed average gain / average loss with the simple mean of the first
//          `period` gains / losses.
// Step 3 — Apply Wilder's exponential smoothing:
//            avg_gain = (prev_avg_gain * (period - 1) + current_gain) / period
//            avg_loss = (prev_avg_loss * (period - 1) + current_loss) / period
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Thresholds:  RSI > 70 => OVERBOUGHT,  RSI < 30 => OVERSOLD.
// =============================================================================

use tracing::debug;

use crate::market_data::series::{IndicatorSeries, TimeSeries};

/// Compute the date-aligned RSI values for `closes` and `period`.
///
/// The returned vector always has `closes.len()` entries; the first `period`
/// positions are undefined (they are consumed seeding the averages).
///
/// # Edge cases
/// - `period == 0` or `closes.len() < period + 1` => all `None` — the series
///   is usable-range-empty, not an error; callers treat it as insufficient
///   data.
/// - If average loss is zero with gains present, RSI is 100.
/// - If both averages are zero (flat price run), RSI is 50 — neutral.
/// - A non-finite intermediate stops the series; later positions stay `None`.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() < period + 1 {
        return out;
    }

    // --- Compute price deltas ------------------------------------------------
    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    // --- Seed averages with the simple mean of the first `period` deltas -----
    let (sum_gain, sum_loss) = deltas[..period].iter().fold((0.0_f64, 0.0_f64), |(g, l), &d| {
        if d > 0.0 {
            (g + d, l)
        } else {
            (g, l + d.abs())
        }
    });

    let period_f = period as f64;
    let mut avg_gain = sum_gain / period_f;
    let mut avg_loss = sum_loss / period_f;

    match rsi_from_averages(avg_gain, avg_loss) {
        Some(rsi) => out[period] = Some(rsi),
        None => return out,
    }

    // --- Wilder's smoothing for subsequent values ----------------------------
    for (i, &delta) in deltas.iter().enumerate().skip(period) {
        let gain = if delta > 0.0 { delta } else { 0.0 };
        let loss = if delta < 0.0 { delta.abs() } else { 0.0 };

        avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;

        match rsi_from_averages(avg_gain, avg_loss) {
            Some(rsi) => out[i + 1] = Some(rsi),
            None => break, // Non-finite — stop producing values.
        }
    }

    out
}

/// Run the engine, producing an `IndicatorSeries` named `RSI-{period}`
/// aligned to the source series' dates.
///
/// Insufficient history yields an all-undefined series rather than an error;
/// downstream callers must treat that as "insufficient data", not crash.
pub fn rsi_series(series: &TimeSeries, period: usize) -> IndicatorSeries {
    let values = calculate_rsi(&series.closes(), period);
    if values.iter().all(Option::is_none) {
        debug!(
            ticker = %series.ticker(),
            period,
            bars = series.len(),
            "RSI: insufficient history — series left undefined"
        );
    }
    IndicatorSeries::from_values(series, format!("RSI-{period}"), values)
}

/// Classify an RSI level the way chart annotations do.
pub fn classify(rsi: f64) -> &'static str {
    if rsi >= 70.0 {
        "OVERBOUGHT"
    } else if rsi <= 30.0 {
        "OVERSOLD"
    } else {
        "NEUTRAL"
    }
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
///
/// - If both averages are zero, RSI is 50.0 (no movement).
/// - If average loss is zero (only gains), RSI is 100.0.
/// - Returns `None` when the result is non-finite.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rsi = if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0 // No movement at all — neutral.
    } else if avg_loss == 0.0 {
        100.0 // All gains, no losses.
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    if rsi.is_finite() {
        Some(rsi)
    } else {
        None
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::series::Bar;
    use chrono::NaiveDate;

    fn series(closes: &[f64]) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 0.0,
            })
            .collect();
        TimeSeries::new("TEST", bars).unwrap()
    }

    fn defined(out: &[Option<f64>]) -> Vec<f64> {
        out.iter().filter_map(|v| *v).collect()
    }

    // ---- calculate_rsi ---------------------------------------------------

    #[test]
    fn rsi_empty_input() {
        assert!(calculate_rsi(&[], 14).is_empty());
    }

    #[test]
    fn rsi_period_zero_all_undefined() {
        let out = calculate_rsi(&[1.0, 2.0, 3.0], 0);
        assert_eq!(out, vec![None, None, None]);
    }

    #[test]
    fn rsi_insufficient_data_all_undefined() {
        // Need period+1 closes (period deltas). 14 closes => 13 deltas < 14.
        let closes: Vec<f64> = (1..=14).map(|x| x as f64).collect();
        let out = calculate_rsi(&closes, 14);
        assert_eq!(out.len(), 14);
        assert!(out.iter().all(Option::is_none));
    }

    #[test]
    fn rsi_warmup_positions_undefined() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let out = calculate_rsi(&closes, 14);
        assert_eq!(out.len(), 30);
        assert!(out[..14].iter().all(Option::is_none));
        assert!(out[14..].iter().all(Option::is_some));
    }

    #[test]
    fn rsi_all_gains() {
        // Strictly ascending prices => RSI should be 100.
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        for v in defined(&calculate_rsi(&closes, 14)) {
            assert!((v - 100.0).abs() < 1e-10, "expected 100.0, got {v}");
        }
    }

    #[test]
    fn rsi_all_losses() {
        // Strictly descending prices => RSI should be 0.
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        for v in defined(&calculate_rsi(&closes, 14)) {
            assert!(v.abs() < 1e-10, "expected 0.0, got {v}");
        }
    }

    #[test]
    fn rsi_flat_market_is_neutral() {
        // No price change at all => RSI = 50 past the warm-up.
        let closes = vec![100.0; 30];
        let out = calculate_rsi(&closes, 14);
        let values = defined(&out);
        assert!(!values.is_empty());
        for v in values {
            assert!((v - 50.0).abs() < 1e-10, "expected 50.0, got {v}");
        }
    }

    #[test]
    fn rsi_range_check() {
        // Arbitrary data — RSI must always be in [0, 100] wherever defined.
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        for v in defined(&calculate_rsi(&closes, 14)) {
            assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
        }
    }

    #[test]
    fn rsi_rising_series_converges_high() {
        // A long monotone rise drives RSI toward 100 at the tail.
        let closes: Vec<f64> = (0..100).map(|i| 100.0 + i as f64 * 0.5).collect();
        let out = calculate_rsi(&closes, 14);
        let last = out.last().copied().flatten().unwrap();
        assert!(last > 95.0, "expected near-100 RSI, got {last}");
    }

    // ---- rsi_series --------------------------------------------------------

    #[test]
    fn series_is_named_and_aligned() {
        let ts = series(&(1..=20).map(|x| x as f64).collect::<Vec<_>>());
        let ind = rsi_series(&ts, 14);
        assert_eq!(ind.name, "RSI-14");
        assert_eq!(ind.points.len(), 20);
        assert_eq!(ind.defined_count(), 6);
    }

    #[test]
    fn short_series_yields_all_undefined_not_error() {
        let ts = series(&[1.0, 2.0, 3.0]);
        let ind = rsi_series(&ts, 14);
        assert!(ind.is_all_undefined());
        assert_eq!(ind.points.len(), 3);
    }

    // ---- classify ----------------------------------------------------------

    #[test]
    fn classify_thresholds() {
        assert_eq!(classify(85.0), "OVERBOUGHT");
        assert_eq!(classify(70.0), "OVERBOUGHT");
        assert_eq!(classify(50.0), "NEUTRAL");
        assert_eq!(classify(30.0), "OVERSOLD");
        assert_eq!(classify(10.0), "OVERSOLD");
    }
}
