// =============================================================================
// Yahoo Finance REST client — public daily-chart endpoint
// =============================================================================
//
// Fetches historical daily bars from `GET /v8/finance/chart/{ticker}` with
// `period1`/`period2` epoch bounds and `interval=1d`.  The endpoint is
// public (no signing), but responses carry their own error envelope under
// `chart.error`, and quote arrays may contain `null` entries for halted
// days — those rows are dropped, never synthesized.
// =============================================================================

use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::{AnalysisError, Result};
use crate::market_data::fetcher::DataFetcher;
use crate::market_data::series::{Bar, TimeSeries};

/// Public Yahoo Finance chart-API base URL.
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// HTTP client for Yahoo's daily-chart endpoint.
#[derive(Debug, Clone)]
pub struct YahooClient {
    base_url: String,
    client: reqwest::Client,
}

impl YahooClient {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Create a new `YahooClient`.
    ///
    /// # Arguments
    /// * `base_url` — endpoint root, overridable for tests/mirrors.
    /// * `timeout`  — per-request timeout applied to every fetch.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into();

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("prism-analyzer/1.0")
            .build()
            .expect("failed to build reqwest client");

        debug!(base_url = %base_url, "YahooClient initialised");

        Self { base_url, client }
    }

    // -------------------------------------------------------------------------
    // Response parsing
    // -------------------------------------------------------------------------

    /// Parse a chart-API response body into a validated [`TimeSeries`].
    ///
    /// Expected shape:
    ///   chart.result[0].timestamp            — epoch seconds per row
    ///   chart.result[0].indicators.quote[0]  — open/high/low/close/volume arrays
    ///
    /// Rows whose close is `null` (halted days) are skipped.  A non-null
    /// `chart.error` is surfaced as a fetch failure with the provider's
    /// description attached.
    pub fn parse_chart_body(ticker: &str, body: &Value) -> Result<TimeSeries> {
        let fetch_err = |reason: String| AnalysisError::Fetch {
            ticker: ticker.to_string(),
            reason,
        };

        let chart = &body["chart"];

        if !chart["error"].is_null() {
            let description = chart["error"]["description"]
                .as_str()
                .unwrap_or("unknown provider error");
            return Err(fetch_err(format!("provider error: {description}")));
        }

        let result = chart["result"]
            .as_array()
            .and_then(|arr| arr.first())
            .ok_or_else(|| fetch_err("response missing chart.result[0]".to_string()))?;

        let timestamps = result["timestamp"]
            .as_array()
            .ok_or_else(|| fetch_err("response missing timestamp array".to_string()))?;

        let quote = &result["indicators"]["quote"][0];
        if quote.is_null() {
            return Err(fetch_err("response missing indicators.quote[0]".to_string()));
        }

        let opens = quote["open"].as_array();
        let highs = quote["high"].as_array();
        let lows = quote["low"].as_array();
        let closes = quote["close"]
            .as_array()
            .ok_or_else(|| fetch_err("response missing close array".to_string()))?;
        let volumes = quote["volume"].as_array();

        let mut bars = Vec::with_capacity(timestamps.len());

        for (i, ts_val) in timestamps.iter().enumerate() {
            let Some(epoch) = ts_val.as_i64() else {
                warn!(ticker, row = i, "skipping row with non-numeric timestamp");
                continue;
            };
            let Some(date) = DateTime::from_timestamp(epoch, 0).map(|dt| dt.date_naive()) else {
                warn!(ticker, row = i, epoch, "skipping row with out-of-range timestamp");
                continue;
            };

            // A null close means the provider has no usable price for the day.
            let Some(close) = closes.get(i).and_then(value_f64) else {
                debug!(ticker, row = i, %date, "skipping row with null close");
                continue;
            };

            let at = |arr: Option<&Vec<Value>>| arr.and_then(|a| a.get(i)).and_then(value_f64);

            bars.push(Bar {
                date,
                open: at(opens).unwrap_or(close),
                high: at(highs).unwrap_or(close),
                low: at(lows).unwrap_or(close),
                close,
                volume: at(volumes).unwrap_or(0.0),
            });
        }

        TimeSeries::new(ticker, bars)
    }

    /// Midnight-UTC epoch seconds for a calendar day.
    fn epoch_secs(date: NaiveDate) -> i64 {
        date.and_time(NaiveTime::MIN).and_utc().timestamp()
    }
}

#[async_trait::async_trait]
impl DataFetcher for YahooClient {
    /// GET /v8/finance/chart/{ticker} (public — no signature required).
    #[instrument(skip(self), name = "yahoo::fetch_daily")]
    async fn fetch_daily(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TimeSeries> {
        let fetch_err = |reason: String| AnalysisError::Fetch {
            ticker: ticker.to_string(),
            reason,
        };

        let period1 = Self::epoch_secs(start);
        // period2 is exclusive on the provider side; push it one day past the
        // requested end so the end date itself is included.
        let period2 = Self::epoch_secs(end + chrono::Duration::days(1));

        let url = format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d",
            self.base_url,
            ticker.trim().to_uppercase(),
            period1,
            period2
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| fetch_err(format!("request failed: {e}")))?;

        let status = resp.status();
        let body: Value = resp
            .json()
            .await
            .map_err(|e| fetch_err(format!("failed to parse response body: {e}")))?;

        if !status.is_success() {
            // Error responses still carry the chart.error envelope when the
            // ticker is unknown; prefer its description over the bare status.
            let description = body["chart"]["error"]["description"]
                .as_str()
                .unwrap_or("no error description");
            return Err(fetch_err(format!("HTTP {status}: {description}")));
        }

        let series = Self::parse_chart_body(ticker, &body)?;

        debug!(
            ticker = %series.ticker(),
            bars = series.len(),
            first = %series.first_date(),
            last = %series.last_date(),
            "daily bars fetched"
        );
        Ok(series)
    }
}

/// Coerce a JSON value that may be a number or numeric string into `f64`.
fn value_f64(val: &Value) -> Option<f64> {
    if let Some(n) = val.as_f64() {
        return Some(n);
    }
    val.as_str().and_then(|s| s.parse::<f64>().ok())
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chart_body(timestamps: Vec<i64>, closes: Vec<Value>) -> Value {
        let n = timestamps.len();
        json!({
            "chart": {
                "result": [{
                    "timestamp": timestamps,
                    "indicators": {
                        "quote": [{
                            "open": vec![Value::Null; n],
                            "high": vec![Value::Null; n],
                            "low": vec![Value::Null; n],
                            "close": closes,
                            "volume": vec![Value::Null; n],
                        }]
                    }
                }],
                "error": null
            }
        })
    }

    // ---- parse_chart_body ------------------------------------------------

    #[test]
    fn parses_rows_into_series() {
        // 2024-01-02 and 2024-01-03, midnight UTC.
        let body = chart_body(
            vec![1_704_153_600, 1_704_240_000],
            vec![json!(101.5), json!(102.25)],
        );
        let series = YahooClient::parse_chart_body("aapl", &body).unwrap();

        assert_eq!(series.ticker(), "AAPL");
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![101.5, 102.25]);
        assert_eq!(
            series.first_date(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
        // Null open/high/low fall back to the close.
        assert_eq!(series.bars()[0].open, 101.5);
        assert_eq!(series.bars()[0].volume, 0.0);
    }

    #[test]
    fn null_close_rows_are_dropped() {
        let body = chart_body(
            vec![1_704_153_600, 1_704_240_000, 1_704_326_400],
            vec![json!(100.0), Value::Null, json!(102.0)],
        );
        let series = YahooClient::parse_chart_body("MSFT", &body).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![100.0, 102.0]);
    }

    #[test]
    fn provider_error_envelope_is_surfaced() {
        let body = json!({
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
            }
        });
        let err = YahooClient::parse_chart_body("ZZZZ", &body).unwrap_err();
        match err {
            AnalysisError::Fetch { ticker, reason } => {
                assert_eq!(ticker, "ZZZZ");
                assert!(reason.contains("delisted"));
            }
            other => panic!("expected Fetch error, got {other:?}"),
        }
    }

    #[test]
    fn missing_quote_block_is_a_fetch_error() {
        let body = json!({ "chart": { "result": [{ "timestamp": [1_704_153_600] }], "error": null } });
        let err = YahooClient::parse_chart_body("AAPL", &body).unwrap_err();
        assert!(matches!(err, AnalysisError::Fetch { .. }));
    }

    #[test]
    fn all_null_closes_is_an_empty_series() {
        let body = chart_body(vec![1_704_153_600], vec![Value::Null]);
        let err = YahooClient::parse_chart_body("AAPL", &body).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptySeries { ticker } if ticker == "AAPL"));
    }

    #[test]
    fn numeric_strings_coerce() {
        assert_eq!(value_f64(&json!("101.5")), Some(101.5));
        assert_eq!(value_f64(&json!(3.25)), Some(3.25));
        assert_eq!(value_f64(&Value::Null), None);
    }

    // ---- epoch conversion ------------------------------------------------

    #[test]
    fn epoch_secs_is_midnight_utc() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(YahooClient::epoch_secs(d), 1_704_153_600);
    }
}
