// =============================================================================
// Prism Stock Analytics — Main Entry Point
// =============================================================================
//
// Fetches daily bars for the requested tickers, runs the analysis engines
// for the selected mode, and writes the rendered report to stdout.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod analysis;
mod cli;
mod config;
mod error;
mod indicators;
mod market_data;
mod orchestrator;
mod render;
mod types;

use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::market_data::YahooClient;
use crate::orchestrator::Orchestrator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Cli::parse();

    let mut config = AppConfig::load(&args.config).unwrap_or_else(|e| {
        warn!(error = %e, "failed to load config, using defaults");
        AppConfig::default()
    });

    // Override the provider base URL from env if available.
    if let Ok(url) = std::env::var("PRISM_YAHOO_BASE_URL") {
        config.yahoo_base_url = url;
    }

    // ── 2. Build the request ─────────────────────────────────────────────
    let request = args.to_request(&config)?;
    info!(
        tickers = ?request.tickers,
        mode = %request.mode,
        start = %request.start,
        end = %request.end,
        "starting analysis"
    );

    // ── 3. Fetch + analyze ───────────────────────────────────────────────
    let fetcher = YahooClient::new(
        &config.yahoo_base_url,
        Duration::from_secs(config.fetch_timeout_secs),
    );
    let report = Orchestrator::new(fetcher).run(&request).await?;

    for failure in report.failures() {
        warn!(ticker = %failure.ticker, reason = %failure.reason, "ticker skipped");
    }

    // ── 4. Render ────────────────────────────────────────────────────────
    print!("{}", render::render(&report, args.format)?);
    Ok(())
}
