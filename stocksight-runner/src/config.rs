//! Dashboard configuration.
//!
//! Loaded from TOML with every field defaulted, then overridden by the
//! environment and finally by CLI flags. The news API key is never read from
//! source; it comes from `[news] api_key` or `STOCKSIGHT_NEWS_API_KEY`.

use chrono::NaiveDate;
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use stocksight_core::data::default_start_date;
use stocksight_core::features::DEFAULT_TRAIN_FRACTION;
use stocksight_core::news::{DEFAULT_HEADLINE_LIMIT, NEWS_API_KEY_ENV};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub price: PriceConfig,
    pub model: ModelConfig,
    pub news: NewsConfig,
    pub run: RunConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PriceConfig {
    pub start_date: NaiveDate,
    /// Inclusive end of the history window. `None` means today.
    pub end_date: Option<NaiveDate>,
    pub cache_dir: PathBuf,
    /// Read `{csv_dir}/{TICKER}.csv` instead of calling the network provider.
    pub csv_dir: Option<PathBuf>,
    /// Cached history older than this is refreshed when online.
    pub cache_max_age_hours: u64,
    pub offline: bool,
    pub synthetic: bool,
    pub timeout_secs: u64,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            start_date: default_start_date(),
            end_date: None,
            cache_dir: PathBuf::from("data/cache"),
            csv_dir: None,
            cache_max_age_hours: 24,
            offline: false,
            synthetic: false,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    pub train_fraction: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            train_fraction: DEFAULT_TRAIN_FRACTION,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NewsConfig {
    pub headline_limit: usize,
    #[serde(deserialize_with = "deserialize_secret")]
    pub api_key: Option<SecretString>,
    pub language: String,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            headline_limit: DEFAULT_HEADLINE_LIMIT,
            api_key: None,
            language: "en".to_string(),
        }
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .filter(|k| !k.trim().is_empty())
        .map(SecretString::from))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Run the price and sentiment pipelines concurrently.
    pub parallel: bool,
    pub output_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            output_dir: PathBuf::from("output"),
        }
    }
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Defaults, then the optional file, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Environment overrides. `lookup` abstracts `std::env::var` for tests.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(NEWS_API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.news.api_key = Some(SecretString::from(key));
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = self.model.train_fraction;
        if !(f > 0.0 && f < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "model.train_fraction must lie in (0, 1), got {f}"
            )));
        }
        if self.news.headline_limit == 0 {
            return Err(ConfigError::Invalid(
                "news.headline_limit must be at least 1".into(),
            ));
        }
        if self.price.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "price.timeout_secs must be at least 1".into(),
            ));
        }
        if let Some(end) = self.price.end_date {
            if end < self.price.start_date {
                return Err(ConfigError::Invalid(format!(
                    "price.end_date {end} precedes start_date {}",
                    self.price.start_date
                )));
            }
        }
        Ok(())
    }

    pub fn end_date(&self) -> NaiveDate {
        self.price
            .end_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    pub fn has_news_key(&self) -> bool {
        self.news.api_key.is_some()
    }
}
