// =============================================================================
// Command-line surface — argument parsing and request construction
// =============================================================================
//
// Pure glue: parses the flags, merges them with the loaded config, and hands
// the orchestrator a validated `AnalysisRequest`.  No domain logic lives
// here.
// =============================================================================

use chrono::{NaiveDate, Utc};
use clap::Parser;

use crate::config::AppConfig;
use crate::error::{AnalysisError, Result};
use crate::orchestrator::AnalysisRequest;
use crate::types::{AnalysisMode, OutputFormat};

/// Days of history fetched when no start date is given.
const DEFAULT_LOOKBACK_DAYS: i64 = 365;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "prism",
    version,
    about = "Daily-bar stock analysis: moving averages, RSI, relative performance, and cross-ticker correlation"
)]
pub struct Cli {
    /// Comma-separated ticker symbols, e.g. "AAPL,MSFT,GOOGL"
    pub tickers: String,

    /// Start date (YYYY-MM-DD). Defaults to one year before today.
    #[arg(short = 's', long)]
    pub start: Option<NaiveDate>,

    /// End date (YYYY-MM-DD). Defaults to today.
    #[arg(short = 'e', long)]
    pub end: Option<NaiveDate>,

    /// Analysis to perform: per-ticker trend view, performance comparison,
    /// or correlation matrix.
    #[arg(long = "analysis", value_enum, default_value_t = AnalysisMode::Full)]
    pub mode: AnalysisMode,

    /// Comma-separated moving-average windows, e.g. "20,50". Used with the
    /// full analysis; falls back to the configured defaults.
    #[arg(long = "ma")]
    pub ma_windows: Option<String>,

    /// RSI smoothing period override.
    #[arg(long)]
    pub rsi_period: Option<usize>,

    /// Output format for the report.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Path to the optional config file.
    #[arg(long, default_value = "prism.json")]
    pub config: String,
}

impl Cli {
    /// Merge the parsed flags with config defaults into an analysis request.
    ///
    /// # Errors
    /// `InvalidParameter` when the `--ma` list contains a non-integer entry.
    pub fn to_request(&self, config: &AppConfig) -> Result<AnalysisRequest> {
        let end = self.end.unwrap_or_else(|| Utc::now().date_naive());
        let start = self
            .start
            .unwrap_or_else(|| end - chrono::Duration::days(DEFAULT_LOOKBACK_DAYS));

        let tickers: Vec<String> = self
            .tickers
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        let ma_windows = match &self.ma_windows {
            Some(raw) => parse_window_list(raw)?,
            None => config.ma_windows.clone(),
        };

        Ok(AnalysisRequest {
            tickers,
            start,
            end,
            mode: self.mode,
            ma_windows,
            rsi_period: self.rsi_period.unwrap_or(config.rsi_period),
        })
    }
}

/// Parse "50,200" into window sizes.
fn parse_window_list(raw: &str) -> Result<Vec<usize>> {
    raw.split(',')
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .map(|w| {
            w.parse::<usize>().map_err(|_| {
                AnalysisError::InvalidParameter(format!(
                    "moving-average window '{w}' is not a positive integer"
                ))
            })
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("prism").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn tickers_split_on_commas() {
        let req = cli(&["AAPL, msft ,GOOGL"])
            .to_request(&AppConfig::default())
            .unwrap();
        assert_eq!(req.tickers, vec!["AAPL", "msft", "GOOGL"]);
    }

    #[test]
    fn defaults_come_from_config() {
        let req = cli(&["AAPL"]).to_request(&AppConfig::default()).unwrap();
        assert_eq!(req.ma_windows, vec![50, 200]);
        assert_eq!(req.rsi_period, 14);
        assert_eq!(req.mode, AnalysisMode::Full);
        assert_eq!(req.end - req.start, chrono::Duration::days(365));
    }

    #[test]
    fn explicit_dates_and_mode() {
        let req = cli(&[
            "AAPL,MSFT",
            "-s",
            "2024-01-01",
            "-e",
            "2024-06-30",
            "--analysis",
            "corr",
        ])
        .to_request(&AppConfig::default())
        .unwrap();
        assert_eq!(req.start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(req.end, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
        assert_eq!(req.mode, AnalysisMode::Corr);
    }

    #[test]
    fn ma_flag_overrides_config() {
        let req = cli(&["AAPL", "--ma", "20, 50"])
            .to_request(&AppConfig::default())
            .unwrap();
        assert_eq!(req.ma_windows, vec![20, 50]);
    }

    #[test]
    fn bad_ma_entry_is_invalid_parameter() {
        let err = cli(&["AAPL", "--ma", "20,abc"])
            .to_request(&AppConfig::default())
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidParameter(_)));
    }

    #[test]
    fn rsi_period_override() {
        let req = cli(&["AAPL", "--rsi-period", "21"])
            .to_request(&AppConfig::default())
            .unwrap();
        assert_eq!(req.rsi_period, 21);
    }
}
