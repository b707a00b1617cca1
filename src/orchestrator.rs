// =============================================================================
// Analysis Orchestrator — fetch fan-out, engine dispatch, report assembly
// =============================================================================
//
// Pipeline for one request:
//   1. Validate parameters (before any network work)
//   2. Fan out one fetch per ticker, concurrently
//   3. Recover per-ticker failures (skip + record), keep the survivors
//   4. Dispatch to the engines for the requested mode
//   5. Assemble a mode-tagged report, ordered by ticker symbol
//
// Results are keyed by ticker and sorted alphabetically, so the report is
// deterministic regardless of fetch completion order.  Every `TimeSeries`
// is owned by the single call that fetched it and dropped with the report.
// The orchestrator never renders.
// =============================================================================

use chrono::NaiveDate;
use futures_util::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::analysis::correlation::correlation_matrix;
use crate::analysis::performance::normalize;
use crate::error::{AnalysisError, Result};
use crate::indicators::rsi::rsi_series;
use crate::indicators::sma::sma_bundle;
use crate::market_data::fetcher::DataFetcher;
use crate::market_data::series::{CorrelationMatrix, IndicatorSeries, NormalizedSeries, TimeSeries};
use crate::types::AnalysisMode;

// =============================================================================
// Request
// =============================================================================

/// A fully specified analysis request, as delivered by the CLI layer.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Requested ticker symbols; normalized and deduplicated before fetching.
    pub tickers: Vec<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub mode: AnalysisMode,
    /// Moving-average window sizes (full mode only).
    pub ma_windows: Vec<usize>,
    /// RSI smoothing period (full mode only).
    pub rsi_period: usize,
}

impl AnalysisRequest {
    /// Validate everything that can be checked without fetching.
    ///
    /// # Errors
    /// `InvalidParameter` for an empty ticker list, an inverted date range,
    /// a zero moving-average window, or correlation with fewer than 2
    /// requested tickers.
    pub fn validate(&self) -> Result<()> {
        if self.tickers.iter().all(|t| t.trim().is_empty()) {
            return Err(AnalysisError::InvalidParameter(
                "at least one ticker symbol is required".to_string(),
            ));
        }
        if self.start > self.end {
            return Err(AnalysisError::InvalidParameter(format!(
                "start date {} is after end date {}",
                self.start, self.end
            )));
        }
        if self.mode == AnalysisMode::Full && self.ma_windows.iter().any(|&w| w == 0) {
            return Err(AnalysisError::InvalidParameter(
                "moving-average window must be >= 1".to_string(),
            ));
        }
        if self.mode == AnalysisMode::Corr && self.normalized_tickers().len() < 2 {
            return Err(AnalysisError::InvalidParameter(format!(
                "correlation needs at least 2 tickers, got {}",
                self.normalized_tickers().len()
            )));
        }
        Ok(())
    }

    /// Trimmed, upper-cased, deduplicated tickers in alphabetical order.
    fn normalized_tickers(&self) -> Vec<String> {
        let mut tickers: Vec<String> = self
            .tickers
            .iter()
            .map(|t| t.trim().to_uppercase())
            .filter(|t| !t.is_empty())
            .collect();
        tickers.sort();
        tickers.dedup();
        tickers
    }
}

// =============================================================================
// Report
// =============================================================================

/// One requested ticker that could not be analyzed, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct TickerFailure {
    pub ticker: String,
    pub reason: String,
}

/// Full-mode bundle for one ticker: its bars plus every derived indicator.
#[derive(Debug, Clone, Serialize)]
pub struct TickerAnalysis {
    pub ticker: String,
    pub series: TimeSeries,
    pub indicators: Vec<IndicatorSeries>,
}

/// Mode-tagged analysis result, consumed by the rendering layer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum AnalysisReport {
    Full {
        tickers: Vec<TickerAnalysis>,
        failures: Vec<TickerFailure>,
    },
    Compare {
        series: Vec<NormalizedSeries>,
        failures: Vec<TickerFailure>,
    },
    Corr {
        matrix: CorrelationMatrix,
        failures: Vec<TickerFailure>,
    },
}

impl AnalysisReport {
    pub fn failures(&self) -> &[TickerFailure] {
        match self {
            Self::Full { failures, .. }
            | Self::Compare { failures, .. }
            | Self::Corr { failures, .. } => failures,
        }
    }
}

// =============================================================================
// Orchestrator
// =============================================================================

pub struct Orchestrator<F: DataFetcher> {
    fetcher: F,
}

impl<F: DataFetcher> Orchestrator<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Run one analysis request end to end.
    pub async fn run(&self, request: &AnalysisRequest) -> Result<AnalysisReport> {
        request.validate()?;

        let tickers = request.normalized_tickers();
        info!(
            mode = %request.mode,
            tickers = ?tickers,
            start = %request.start,
            end = %request.end,
            "analysis request accepted"
        );

        let (fetched, mut failures) = self.fetch_all(&tickers, request).await;

        match request.mode {
            AnalysisMode::Full => Self::run_full(fetched, failures, request),
            AnalysisMode::Compare => Self::run_compare(fetched, failures),
            AnalysisMode::Corr => {
                if fetched.len() < 2 {
                    for f in &failures {
                        warn!(ticker = %f.ticker, reason = %f.reason, "correlation input missing");
                    }
                    return Err(AnalysisError::InsufficientTickers {
                        succeeded: fetched.len(),
                    });
                }
                let matrix = correlation_matrix(&fetched)?;
                failures.sort_by(|a, b| a.ticker.cmp(&b.ticker));
                Ok(AnalysisReport::Corr { matrix, failures })
            }
        }
    }

    // -------------------------------------------------------------------------
    // Fetch fan-out
    // -------------------------------------------------------------------------

    /// Fetch every ticker concurrently; per-ticker failures are recovered
    /// locally and recorded, never aborting the siblings.
    ///
    /// `tickers` arrives sorted and `join_all` preserves input order, so the
    /// survivors come back alphabetical no matter which fetch finishes first.
    async fn fetch_all(
        &self,
        tickers: &[String],
        request: &AnalysisRequest,
    ) -> (Vec<TimeSeries>, Vec<TickerFailure>) {
        let futures = tickers.iter().map(|ticker| async move {
            let result = self
                .fetcher
                .fetch_daily(ticker, request.start, request.end)
                .await;
            (ticker.clone(), result)
        });

        let mut fetched = Vec::with_capacity(tickers.len());
        let mut failures = Vec::new();

        for (ticker, result) in join_all(futures).await {
            match result {
                Ok(series) => fetched.push(series),
                Err(e) => {
                    warn!(ticker = %ticker, error = %e, "ticker skipped");
                    failures.push(TickerFailure {
                        ticker,
                        reason: e.to_string(),
                    });
                }
            }
        }

        (fetched, failures)
    }

    // -------------------------------------------------------------------------
    // Per-mode assembly
    // -------------------------------------------------------------------------

    fn run_full(
        fetched: Vec<TimeSeries>,
        mut failures: Vec<TickerFailure>,
        request: &AnalysisRequest,
    ) -> Result<AnalysisReport> {
        let mut bundles = Vec::with_capacity(fetched.len());

        for series in fetched {
            match sma_bundle(&series, &request.ma_windows) {
                Ok(mut indicators) => {
                    indicators.push(rsi_series(&series, request.rsi_period));
                    bundles.push(TickerAnalysis {
                        ticker: series.ticker().to_string(),
                        series,
                        indicators,
                    });
                }
                Err(e) => {
                    warn!(ticker = %series.ticker(), error = %e, "indicator computation failed — ticker skipped");
                    failures.push(TickerFailure {
                        ticker: series.ticker().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if bundles.is_empty() {
            return Err(AnalysisError::NoData);
        }

        failures.sort_by(|a, b| a.ticker.cmp(&b.ticker));
        Ok(AnalysisReport::Full {
            tickers: bundles,
            failures,
        })
    }

    fn run_compare(
        fetched: Vec<TimeSeries>,
        mut failures: Vec<TickerFailure>,
    ) -> Result<AnalysisReport> {
        let mut normalized = Vec::with_capacity(fetched.len());

        for series in &fetched {
            match normalize(series) {
                Ok(ns) => normalized.push(ns),
                Err(e) => {
                    warn!(ticker = %series.ticker(), error = %e, "normalization failed — ticker skipped");
                    failures.push(TickerFailure {
                        ticker: series.ticker().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if normalized.is_empty() {
            return Err(AnalysisError::NoData);
        }

        failures.sort_by(|a, b| a.ticker.cmp(&b.ticker));
        Ok(AnalysisReport::Compare {
            series: normalized,
            failures,
        })
    }
}
