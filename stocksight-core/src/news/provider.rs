use crate::data::DataError;
use crate::domain::{Headline, Ticker};
use crate::error::{ForecastError, Stage};
use std::cmp::Reverse;
use tracing::info;

/// Default cap on headlines per request.
pub const DEFAULT_HEADLINE_LIMIT: usize = 10;

/// Upstream headline feed. Implementations may return headlines in any order
/// and any number; [`NewsSource`] sorts and truncates.
pub trait NewsProvider: Send + Sync {
    fn name(&self) -> &str;

    fn fetch(&self, symbol: &str) -> Result<Vec<Headline>, DataError>;
}

/// Most recent `limit` headlines, newest first.
///
/// Undated headlines sort after dated ones; ties keep upstream order.
pub fn recent_headlines(mut headlines: Vec<Headline>, limit: usize) -> Vec<Headline> {
    headlines.sort_by_key(|h| (h.published_at.is_none(), Reverse(h.published_at)));
    headlines.truncate(limit);
    headlines
}

pub struct NewsSource<'a> {
    provider: &'a dyn NewsProvider,
    limit: usize,
}

impl<'a> NewsSource<'a> {
    pub fn new(provider: &'a dyn NewsProvider) -> Self {
        Self {
            provider,
            limit: DEFAULT_HEADLINE_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// An empty result is valid ("no news"); only a failed request is an error.
    pub fn fetch_headlines(&self, ticker: &Ticker) -> Result<Vec<Headline>, ForecastError> {
        let raw = self
            .provider
            .fetch(ticker.as_str())
            .map_err(|e| ForecastError::unavailable(ticker.as_str(), Stage::News, e))?;
        let fetched = raw.len();
        let headlines = recent_headlines(raw, self.limit);
        info!(
            ticker = %ticker,
            provider = self.provider.name(),
            fetched,
            kept = headlines.len(),
            "headlines loaded"
        );
        Ok(headlines)
    }
}

/// Serves a fixed headline list. Used for offline runs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticNewsProvider {
    headlines: Vec<Headline>,
}

impl StaticNewsProvider {
    pub fn new(headlines: Vec<Headline>) -> Self {
        Self { headlines }
    }
}

impl NewsProvider for StaticNewsProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch(&self, _symbol: &str) -> Result<Vec<Headline>, DataError> {
        Ok(self.headlines.clone())
    }
}
