//! Price provider trait and transport-level error types.
//!
//! The PriceProvider trait abstracts over data sources (Yahoo Finance, CSV
//! import, synthetic) so the loader can swap implementations and tests can
//! run without a network.

use crate::domain::PriceBar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error types for data operations.
///
/// These are displayable in CLI output and carried as the `source` of
/// [`crate::ForecastError::DataUnavailable`].
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("provider returned no rows for {symbol}")]
    EmptyResponse { symbol: String },

    #[error("hard stop: provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("provider error: {0}")]
    Provider(String),

    #[error("cache error: {0}")]
    CacheError(String),

    #[error("parquet I/O error: {0}")]
    ParquetError(String),

    #[error("csv import error: {0}")]
    CsvError(String),

    #[error("no cached data for symbol '{symbol}' (run `download {symbol}` first)")]
    NoCachedData { symbol: String },

    #[error("data error: {0}")]
    Other(String),
}

impl DataError {
    /// Map a `reqwest` transport failure. Timeouts count as unreachable so
    /// callers see a single "no data" condition.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() || err.is_request() {
            DataError::NetworkUnreachable(err.to_string())
        } else if err.is_decode() {
            DataError::ResponseFormatChanged(err.to_string())
        } else {
            DataError::Other(err.to_string())
        }
    }

    /// Whether retrying the same request later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DataError::NetworkUnreachable(_) | DataError::RateLimited { .. }
        )
    }
}

/// Result of a successful price fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub bars: Vec<PriceBar>,
    pub source: DataSource,
    /// Non-fatal conditions the caller should surface (e.g. a cached window
    /// narrower than requested).
    pub warnings: Vec<String>,
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    YahooFinance,
    CsvImport,
    Cache,
    Synthetic,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DataSource::YahooFinance => "Yahoo Finance",
            DataSource::CsvImport => "CSV import",
            DataSource::Cache => "cache",
            DataSource::Synthetic => "synthetic",
        })
    }
}

/// Trait for daily OHLCV providers.
///
/// Implementations handle the specifics of one upstream. They are not trusted
/// to return clean data: bars may be unsorted, duplicated, or carry `NaN`
/// fields. The cache layer sits above this trait.
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily OHLCV bars for a symbol over an inclusive date range.
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<FetchResult, DataError>;

    /// Check if the provider is currently available (not rate-limited, not blocked).
    fn is_available(&self) -> bool {
        true
    }
}
