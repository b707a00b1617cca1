// =============================================================================
// Data Fetcher boundary
// =============================================================================
//
// The engine layer never talks to a provider directly; it consumes this trait
// and receives either a complete, already-validated `TimeSeries` or an
// explicit per-ticker failure.  Retry and timeout policy live behind the
// trait, inside the concrete client.
// =============================================================================

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;
use crate::market_data::series::TimeSeries;

/// Source of historical daily bars for a ticker and date range.
#[async_trait]
pub trait DataFetcher: Send + Sync {
    /// Fetch daily bars for `ticker` over `[start, end]` (both inclusive).
    ///
    /// # Errors
    /// - `Fetch` for transport or provider failures (ticker attached).
    /// - `EmptySeries` when the range contains no trading days or the ticker
    ///   is unknown to the provider.
    async fn fetch_daily(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TimeSeries>;
}
