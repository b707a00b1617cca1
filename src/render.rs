// =============================================================================
// Report rendering — text and JSON views of an AnalysisReport
// =============================================================================
//
// Consumes the orchestrator's structured result and produces terminal text
// or machine-readable JSON.  Never computes: everything shown here was
// derived by the engines.
// =============================================================================

use std::fmt::Write;

use anyhow::Result;

use crate::indicators::rsi;
use crate::orchestrator::{AnalysisReport, TickerAnalysis, TickerFailure};
use crate::types::OutputFormat;

/// Render a report in the requested output format.
pub fn render(report: &AnalysisReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)? + "\n"),
        OutputFormat::Text => render_text(report),
    }
}

fn render_text(report: &AnalysisReport) -> Result<String> {
    let mut out = String::new();

    match report {
        AnalysisReport::Full { tickers, failures } => {
            for bundle in tickers {
                render_ticker_bundle(&mut out, bundle)?;
            }
            render_failures(&mut out, failures)?;
        }
        AnalysisReport::Compare { series, failures } => {
            writeln!(out, "Performance comparison (first in-range close = 100)")?;
            writeln!(
                out,
                "{:<8} {:>12} {:>12} {:>10} {:>9}",
                "TICKER", "FROM", "TO", "INDEX", "CHANGE"
            )?;
            for ns in series {
                // The normalizer guarantees at least one point per series.
                let (first, last) = match (ns.first(), ns.last()) {
                    (Some(f), Some(l)) => (f, l),
                    _ => continue,
                };
                writeln!(
                    out,
                    "{:<8} {:>12} {:>12} {:>10.2} {:>+8.2}%",
                    ns.ticker,
                    first.date.to_string(),
                    last.date.to_string(),
                    last.index,
                    last.index - 100.0
                )?;
            }
            render_failures(&mut out, failures)?;
        }
        AnalysisReport::Corr { matrix, failures } => {
            writeln!(out, "Correlation matrix (Pearson, common dates only)")?;
            let labels = matrix.labels();
            let width = labels.iter().map(|l| l.len()).max().unwrap_or(6).max(6) + 2;

            write!(out, "{:width$}", "")?;
            for label in labels {
                write!(out, "{label:>width$}")?;
            }
            writeln!(out)?;

            for (i, label) in labels.iter().enumerate() {
                write!(out, "{label:<width$}")?;
                for value in &matrix.values()[i] {
                    write!(out, "{value:>width$.2}")?;
                }
                writeln!(out)?;
            }
            render_failures(&mut out, failures)?;
        }
    }

    Ok(out)
}

fn render_ticker_bundle(out: &mut String, bundle: &TickerAnalysis) -> Result<()> {
    let series = &bundle.series;
    writeln!(out, "── {} ──", bundle.ticker)?;
    writeln!(
        out,
        "  {} bars  ({} → {})  last close {:.2}",
        series.len(),
        series.first_date(),
        series.last_date(),
        series.last_close()
    )?;

    for indicator in &bundle.indicators {
        match indicator.last_defined() {
            Some((date, value)) => {
                let tag = if indicator.name.starts_with("RSI") {
                    format!("  {}", rsi::classify(value))
                } else {
                    String::new()
                };
                writeln!(
                    out,
                    "  {:<8} {:>10.2}  as of {}{}",
                    indicator.name, value, date, tag
                )?;
            }
            None => {
                writeln!(out, "  {:<8} insufficient data", indicator.name)?;
            }
        }
    }
    writeln!(out)?;
    Ok(())
}

fn render_failures(out: &mut String, failures: &[TickerFailure]) -> Result<()> {
    if failures.is_empty() {
        return Ok(());
    }
    writeln!(out, "Skipped tickers:")?;
    for f in failures {
        writeln!(out, "  {} — {}", f.ticker, f.reason)?;
    }
    Ok(())
}
