//! Price history resolution for the dashboard.
//!
//! Implements the fallback policy:
//! 1. If fresh cached data covers the requested window → use it
//! 2. Otherwise, if online and an upstream provider is configured → download and cache
//! 3. If the download fails but stale cache exists → use the stale cache
//! 4. If nothing worked and `synthetic` is set → generate synthetic bars (tagged)
//! 5. Otherwise → fail with a clear error
//!
//! Offline, the cache is served even when it is narrower than the window;
//! the result then carries a warning naming the range actually cached.
//!
//! Synthetic data is a developer-only debug mode and is never cached.

use chrono::{Duration, Local, NaiveDate};
use stocksight_core::data::{
    CoverageResult, DataError, DataSource, FetchResult, PriceCache, PriceProvider,
    SyntheticProvider,
};
use stocksight_core::domain::PriceBar;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(
        "no cached data for '{symbol}' and no network access (use --synthetic for synthetic data)"
    )]
    NoCachedDataOffline { symbol: String },

    #[error("no cached data for '{symbol}' and download failed: {source}")]
    DownloadFailed {
        symbol: String,
        #[source]
        source: DataError,
    },

    #[error("data error: {0}")]
    Data(#[from] DataError),
}

impl From<LoadError> for DataError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::NoCachedDataOffline { symbol } => DataError::NoCachedData { symbol },
            LoadError::DownloadFailed { source, .. } => source,
            LoadError::Data(e) => e,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Never make network requests.
    pub offline: bool,
    /// Generate synthetic bars when real data is unavailable.
    pub synthetic: bool,
    /// Ignore the cache and re-download.
    pub force: bool,
    /// Cached history older than this is refreshed when online.
    pub max_cache_age: Duration,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            offline: false,
            synthetic: false,
            force: false,
            max_cache_age: Duration::hours(24),
        }
    }
}

/// A [`PriceProvider`] that layers the cache and synthetic fallback over an
/// optional upstream provider.
pub struct DataLoader {
    cache: PriceCache,
    upstream: Option<Box<dyn PriceProvider>>,
    synthetic: SyntheticProvider,
    opts: LoadOptions,
}

impl DataLoader {
    pub fn new(
        cache: PriceCache,
        upstream: Option<Box<dyn PriceProvider>>,
        opts: LoadOptions,
    ) -> Self {
        Self {
            cache,
            upstream,
            synthetic: SyntheticProvider::default(),
            opts,
        }
    }

    pub fn cache(&self) -> &PriceCache {
        &self.cache
    }

    pub fn options(&self) -> &LoadOptions {
        &self.opts
    }

    fn is_fresh(&self, symbol: &str) -> bool {
        self.cache
            .get_meta(symbol)
            .map(|meta| Local::now().naive_local() - meta.cached_at <= self.opts.max_cache_age)
            .unwrap_or(false)
    }

    fn upstream(&self) -> Option<&dyn PriceProvider> {
        if self.opts.offline {
            return None;
        }
        self.upstream
            .as_deref()
            .filter(|provider| provider.is_available())
    }

    pub fn load(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, LoadError> {
        let upstream = self.upstream();

        // Step 1: cache, served only when it covers the window or nothing
        // better is reachable.
        let mut stale = None;
        if !self.opts.force {
            match self.cache.load(symbol) {
                Ok(bars) if !bars.is_empty() => {
                    let coverage = self.cache.covers_range(symbol, start, end);
                    let covered = coverage == CoverageResult::FullyCovered;
                    if upstream.is_none() {
                        debug!(symbol, rows = bars.len(), covered, "using cached history");
                        return Ok(from_cache(symbol, bars, start, end, covered));
                    }
                    if covered && self.is_fresh(symbol) {
                        debug!(symbol, rows = bars.len(), "using cached history");
                        return Ok(from_cache(symbol, bars, start, end, true));
                    }
                    if !covered {
                        debug!(symbol, ?coverage, %start, %end, "cache does not cover window");
                    }
                    stale = Some((bars, covered));
                }
                Ok(_) => {}
                Err(e) => debug!(symbol, error = %e, "cache miss"),
            }
        }

        // Step 2: download
        let mut download_error = None;
        if let Some(provider) = upstream {
            match provider.fetch(symbol, start, end) {
                Ok(fetched) => {
                    if let Err(e) =
                        self.cache
                            .write_window(symbol, &fetched.bars, fetched.source, start, end)
                    {
                        warn!(symbol, error = %e, "failed to cache downloaded history");
                    }
                    info!(
                        symbol,
                        provider = provider.name(),
                        rows = fetched.bars.len(),
                        "downloaded history"
                    );
                    return Ok(fetched);
                }
                Err(e) => {
                    // Step 3: stale cache beats no data
                    if let Some((bars, covered)) = stale {
                        warn!(symbol, error = %e, "download failed, using stale cache");
                        let mut result = from_cache(symbol, bars, start, end, covered);
                        result
                            .warnings
                            .insert(0, format!("price download failed ({e}); using cached history"));
                        return Ok(result);
                    }
                    download_error = Some(e);
                }
            }
        }

        // Step 4: synthetic fallback
        if self.opts.synthetic {
            warn!(symbol, "generating synthetic data; results are tagged as synthetic");
            return Ok(FetchResult {
                symbol: symbol.to_string(),
                bars: self.synthetic.generate(symbol, start, end),
                source: DataSource::Synthetic,
                warnings: Vec::new(),
            });
        }

        // Step 5: fail
        match download_error {
            Some(source) => Err(LoadError::DownloadFailed {
                symbol: symbol.to_string(),
                source,
            }),
            None if self.opts.offline => Err(LoadError::NoCachedDataOffline {
                symbol: symbol.to_string(),
            }),
            None => Err(LoadError::DownloadFailed {
                symbol: symbol.to_string(),
                source: DataError::Other("no price provider configured".into()),
            }),
        }
    }
}

/// Clip cached bars to the window. An uncovered window is served as-is with a
/// warning naming the range the cache actually holds.
fn from_cache(
    symbol: &str,
    bars: Vec<PriceBar>,
    start: NaiveDate,
    end: NaiveDate,
    covered: bool,
) -> FetchResult {
    let mut warnings = Vec::new();
    if !covered {
        if let (Some(first), Some(last)) = (bars.first(), bars.last()) {
            warn!(symbol, cached_start = %first.date, cached_end = %last.date, "serving partial cache");
            warnings.push(format!(
                "cached history covers {} to {}, narrower than the requested {start} to {end}",
                first.date, last.date
            ));
        }
    }
    FetchResult {
        symbol: symbol.to_string(),
        bars: bars
            .into_iter()
            .filter(|b| b.date >= start && b.date <= end)
            .collect(),
        source: DataSource::Cache,
        warnings,
    }
}

impl PriceProvider for DataLoader {
    fn name(&self) -> &str {
        "cache"
    }

    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<FetchResult, DataError> {
        self.load(symbol, start, end).map_err(DataError::from)
    }
}
