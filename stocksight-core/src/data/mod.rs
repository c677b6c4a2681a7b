//! Price and company-profile data: providers, cache, and the series source.

pub mod cache;
pub mod circuit_breaker;
pub mod csv_import;
pub mod profile;
pub mod provider;
pub mod source;
pub mod synthetic;
pub mod yahoo;

pub use cache::{CacheMeta, CacheStatus, CoverageResult, PriceCache};
pub use circuit_breaker::CircuitBreaker;
pub use csv_import::CsvProvider;
pub use profile::{ProfileProvider, YahooProfileProvider};
pub use provider::{DataError, DataSource, FetchResult, PriceProvider};
pub use source::{default_start_date, PriceHistory, PriceSeriesSource};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;
