// =============================================================================
// Market-data model — daily bars and the series types derived from them
// =============================================================================
//
// `TimeSeries` is the canonical representation of one ticker's dated bars.
// It is constructed once from raw provider rows, validated and normalised at
// that point, and never mutated afterwards.  Dates inside a series are
// strictly increasing and unique; calendar gaps (weekends, holidays) are
// simply absent rows.
//
// The derived types (`IndicatorSeries`, `NormalizedSeries`,
// `CorrelationMatrix`) are read-only engine outputs.
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// Bar
// ---------------------------------------------------------------------------

/// One trading day's OHLCV row for a ticker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

// ---------------------------------------------------------------------------
// TimeSeries
// ---------------------------------------------------------------------------

/// An ordered, immutable sequence of daily bars for a single ticker.
#[derive(Debug, Clone, Serialize)]
pub struct TimeSeries {
    ticker: String,
    bars: Vec<Bar>,
}

impl TimeSeries {
    /// Build a series from raw bars supplied by the data fetcher.
    ///
    /// The ticker is trimmed and upper-cased; bars are sorted by date and
    /// de-duplicated (first occurrence wins) so the strictly-increasing
    /// date invariant always holds after construction.
    ///
    /// # Errors
    /// - `InvalidParameter` when the ticker symbol is empty.
    /// - `EmptySeries` when zero bars are supplied.
    pub fn new(ticker: &str, mut bars: Vec<Bar>) -> Result<Self> {
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(AnalysisError::InvalidParameter(
                "ticker symbol must not be empty".to_string(),
            ));
        }
        if bars.is_empty() {
            return Err(AnalysisError::EmptySeries { ticker });
        }

        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);

        Ok(Self { ticker, bars })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// All dates in the series, in order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    /// The close-price subsequence, aligned with `dates()`.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// First close in the series (the constructor guarantees at least one bar).
    pub fn first_close(&self) -> f64 {
        self.bars[0].close
    }

    /// Close price on an exact date, if that date traded.
    pub fn close_on(&self, date: NaiveDate) -> Option<f64> {
        self.bars
            .binary_search_by_key(&date, |b| b.date)
            .ok()
            .map(|idx| self.bars[idx].close)
    }

    pub fn first_date(&self) -> NaiveDate {
        self.bars[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.bars[self.bars.len() - 1].date
    }

    pub fn last_close(&self) -> f64 {
        self.bars[self.bars.len() - 1].close
    }
}

// ---------------------------------------------------------------------------
// IndicatorSeries
// ---------------------------------------------------------------------------

/// One dated indicator value; `None` marks insufficient history at that date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// A derived indicator series ("SMA-50", "RSI-14"), aligned 1:1 with the
/// dates of the source [`TimeSeries`].
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorSeries {
    pub ticker: String,
    pub name: String,
    pub points: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Zip per-index values against the source series' dates.
    ///
    /// `values` must be aligned with the source bars; the engines guarantee
    /// this by producing one entry per close.
    pub fn from_values(source: &TimeSeries, name: String, values: Vec<Option<f64>>) -> Self {
        debug_assert_eq!(values.len(), source.len());
        let points = source
            .bars()
            .iter()
            .zip(values)
            .map(|(bar, value)| IndicatorPoint {
                date: bar.date,
                value,
            })
            .collect();
        Self {
            ticker: source.ticker().to_string(),
            name,
            points,
        }
    }

    /// Number of dates with a defined value.
    pub fn defined_count(&self) -> usize {
        self.points.iter().filter(|p| p.value.is_some()).count()
    }

    /// The most recent defined point, if any exists.
    pub fn last_defined(&self) -> Option<(NaiveDate, f64)> {
        self.points
            .iter()
            .rev()
            .find_map(|p| p.value.map(|v| (p.date, v)))
    }

    /// True when no date has a usable value (insufficient history overall).
    pub fn is_all_undefined(&self) -> bool {
        self.points.iter().all(|p| p.value.is_none())
    }
}

// ---------------------------------------------------------------------------
// NormalizedSeries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedPoint {
    pub date: NaiveDate,
    pub index: f64,
}

/// A close-price series rebased so its first in-range value is exactly 100.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedSeries {
    pub ticker: String,
    pub points: Vec<NormalizedPoint>,
}

impl NormalizedSeries {
    pub fn first(&self) -> Option<&NormalizedPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&NormalizedPoint> {
        self.points.last()
    }
}

// ---------------------------------------------------------------------------
// CorrelationMatrix
// ---------------------------------------------------------------------------

/// Pairwise Pearson correlation coefficients over the aligned date set.
///
/// Symmetric with a unit diagonal; `values[i][j]` corresponds to
/// `labels[i]` × `labels[j]`.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    labels: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub(crate) fn new(labels: Vec<String>, values: Vec<Vec<f64>>) -> Self {
        debug_assert!(values.len() == labels.len());
        debug_assert!(values.iter().all(|row| row.len() == labels.len()));
        Self { labels, values }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Coefficient for a label pair, if both labels are present.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == a)?;
        let j = self.labels.iter().position(|l| l == b)?;
        Some(self.values[i][j])
    }
}
