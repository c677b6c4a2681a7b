//! StockSight Core: price history, close-price regression, and headline sentiment.
//!
//! This crate holds everything that does not depend on configuration files or
//! the terminal:
//! - Domain types (bars, series, tickers, headlines, sentiment, profiles)
//! - Price providers (Yahoo, CSV, synthetic) with a circuit breaker and a Parquet cache
//! - News providers and the lexicon sentiment measure
//! - Feature derivation, the chronological split, OLS, and result assembly

pub mod data;
pub mod domain;
pub mod error;
pub mod features;
pub mod model;
pub mod news;
pub mod pipeline;
pub mod results;
pub mod sentiment;

pub use error::{ForecastError, Stage};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything a worker thread touches is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::PriceSeries>();
        require_sync::<domain::PriceSeries>();
        require_send::<domain::Headline>();
        require_sync::<domain::Headline>();
        require_send::<domain::CompanyProfile>();
        require_sync::<domain::CompanyProfile>();
        require_send::<ForecastError>();
        require_sync::<ForecastError>();

        require_send::<pipeline::PriceForecast>();
        require_sync::<pipeline::PriceForecast>();
        require_send::<pipeline::SentimentReport>();
        require_sync::<pipeline::SentimentReport>();

        require_send::<data::CircuitBreaker>();
        require_sync::<data::CircuitBreaker>();
        require_send::<data::YahooProvider>();
        require_sync::<data::YahooProvider>();
        require_send::<news::NewsApiProvider>();
        require_sync::<news::NewsApiProvider>();
        require_send::<sentiment::SentimentScorer>();
        require_sync::<sentiment::SentimentScorer>();
    }

    /// Providers are usable as trait objects across the pipeline boundary.
    #[test]
    fn providers_are_object_safe() {
        fn _price(_: &dyn data::PriceProvider) {}
        fn _news(_: &dyn news::NewsProvider) {}
        fn _profile(_: &dyn data::ProfileProvider) {}
        fn _measure(_: &dyn sentiment::PolarityScorer) {}
    }
}
