pub mod fetcher;
pub mod series;
pub mod yahoo;

// Re-export the model types for convenient access (e.g. `use crate::market_data::TimeSeries`).
pub use fetcher::DataFetcher;
pub use series::{
    Bar, CorrelationMatrix, IndicatorPoint, IndicatorSeries, NormalizedPoint, NormalizedSeries,
    TimeSeries,
};
pub use yahoo::YahooClient;
