//! Wiring of concrete providers from configuration.

use crate::config::DashboardConfig;
use crate::data_loader::{DataLoader, LoadOptions};
use chrono::Duration as ChronoDuration;
use std::sync::Arc;
use std::time::Duration;
use stocksight_core::data::{
    CircuitBreaker, CsvProvider, DataError, PriceCache, PriceProvider, ProfileProvider,
    YahooProfileProvider, YahooProvider,
};
use stocksight_core::news::{NewsApiProvider, NewsProvider};
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

/// About a century; keeps the hour count inside `chrono`'s range.
const MAX_CACHE_AGE_HOURS: u64 = 876_000;

/// Everything the dashboard talks to. Optional collaborators are absent when
/// offline or unconfigured; their sections degrade with a warning.
pub struct ProviderSet {
    pub price: Box<dyn PriceProvider>,
    pub news: Option<Box<dyn NewsProvider>>,
    pub profile: Option<Box<dyn ProfileProvider>>,
}

impl ProviderSet {
    pub fn from_config(config: &DashboardConfig) -> Result<Self, DataError> {
        let timeout = Duration::from_secs(config.price.timeout_secs);
        let online = !config.price.offline;

        // Chart and quoteSummary share one host, so they share a breaker.
        let yahoo_breaker = Arc::new(CircuitBreaker::default_provider());

        let upstream: Option<Box<dyn PriceProvider>> = match (&config.price.csv_dir, online) {
            (Some(dir), _) => Some(Box::new(CsvProvider::new(dir.clone()))),
            (None, true) => Some(Box::new(YahooProvider::new(
                Arc::clone(&yahoo_breaker),
                timeout,
            )?)),
            (None, false) => None,
        };

        let opts = LoadOptions {
            // A local CSV directory counts as reachable even offline.
            offline: !online && config.price.csv_dir.is_none(),
            synthetic: config.price.synthetic,
            force: false,
            max_cache_age: ChronoDuration::hours(
                config.price.cache_max_age_hours.min(MAX_CACHE_AGE_HOURS) as i64,
            ),
        };
        let price: Box<dyn PriceProvider> = Box::new(DataLoader::new(
            PriceCache::new(&config.price.cache_dir),
            upstream,
            opts,
        ));

        let news: Option<Box<dyn NewsProvider>> = match (&config.news.api_key, online) {
            (Some(key), true) => Some(Box::new(
                NewsApiProvider::new(
                    SecretString::from(key.expose_secret()),
                    Arc::new(CircuitBreaker::default_provider()),
                    timeout,
                )?
                .with_language(config.news.language.clone())
                .with_page_size(config.news.headline_limit.max(20)),
            )),
            _ => None,
        };

        let profile: Option<Box<dyn ProfileProvider>> = if online {
            Some(Box::new(YahooProfileProvider::new(yahoo_breaker, timeout)?))
        } else {
            None
        };

        info!(
            offline = !online,
            news = news.is_some(),
            profile = profile.is_some(),
            "providers configured"
        );
        Ok(Self {
            price,
            news,
            profile,
        })
    }
}
