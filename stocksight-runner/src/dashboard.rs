//! One-ticker dashboard: price forecast, headline sentiment, company profile.
//!
//! The price pipeline is fatal: any failure aborts the request with a
//! `ForecastError` that names the stage. Sentiment and profile failures are
//! recorded as warnings and the dashboard is still produced.

use crate::config::DashboardConfig;
use crate::providers::ProviderSet;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use stocksight_core::data::{DataSource, PriceProvider, PriceSeriesSource, ProfileProvider};
use stocksight_core::domain::{CompanyProfile, Ticker};
use stocksight_core::features::FeatureBuilder;
use stocksight_core::news::{NewsProvider, NewsSource};
use stocksight_core::pipeline::{analyze_headlines, forecast_prices, PriceForecast, SentimentReport};
use stocksight_core::sentiment::{LexiconScorer, SentimentScorer};
use stocksight_core::{ForecastError, Stage};
use tracing::{info, warn};

/// Bump when the serialized dashboard layout changes incompatibly.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub source: DataSource,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SentimentSection {
    Available(SentimentReport),
    Unavailable { reason: String },
}

impl SentimentSection {
    pub fn report(&self) -> Option<&SentimentReport> {
        match self {
            SentimentSection::Available(report) => Some(report),
            SentimentSection::Unavailable { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub schema_version: u32,
    pub ticker: Ticker,
    pub generated_at: DateTime<Utc>,
    pub history: HistorySummary,
    pub forecast: PriceForecast,
    pub sentiment: SentimentSection,
    pub profile: Option<CompanyProfile>,
    /// Non-fatal failures, one line each.
    pub warnings: Vec<String>,
}

impl Dashboard {
    pub fn is_synthetic(&self) -> bool {
        self.history.source == DataSource::Synthetic
    }
}

/// Borrowed view of the collaborators, so tests can pass stubs directly.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub price: &'a dyn PriceProvider,
    pub news: Option<&'a dyn NewsProvider>,
    pub profile: Option<&'a dyn ProfileProvider>,
}

impl<'a> From<&'a ProviderSet> for Collaborators<'a> {
    fn from(set: &'a ProviderSet) -> Self {
        Self {
            price: set.price.as_ref(),
            news: set.news.as_deref(),
            profile: set.profile.as_deref(),
        }
    }
}

type PriceOutcome = Result<(HistorySummary, PriceForecast, Vec<String>), ForecastError>;

/// Why the sentiment section is empty.
enum SentimentGap {
    /// No news provider for this run; the text says why.
    NotConfigured(&'static str),
    Failed(ForecastError),
}

fn run_price(
    ticker: &Ticker,
    provider: &dyn PriceProvider,
    config: &DashboardConfig,
) -> PriceOutcome {
    let builder = FeatureBuilder::new(config.model.train_fraction)?;
    let loaded = PriceSeriesSource::new(provider)
        .with_start(config.price.start_date)
        .fetch_until(ticker, config.end_date())?;
    let series = &loaded.series;
    let forecast = forecast_prices(series, &builder)?;
    let history = HistorySummary {
        source: loaded.source,
        start: series.first_date(),
        end: series.last_date(),
        rows: series.len(),
    };
    Ok((history, forecast, loaded.warnings))
}

fn run_sentiment(
    ticker: &Ticker,
    provider: Option<&dyn NewsProvider>,
    config: &DashboardConfig,
) -> Result<SentimentReport, SentimentGap> {
    let provider = provider.ok_or(SentimentGap::NotConfigured(if config.price.offline {
        "news is not fetched in offline mode"
    } else {
        "no news API key configured"
    }))?;
    let headlines = NewsSource::new(provider)
        .with_limit(config.news.headline_limit)
        .fetch_headlines(ticker)
        .map_err(SentimentGap::Failed)?;
    Ok(analyze_headlines(
        &headlines,
        &SentimentScorer::<LexiconScorer>::default(),
    ))
}

fn run_profile(
    ticker: &Ticker,
    provider: Option<&dyn ProfileProvider>,
) -> Option<Result<CompanyProfile, ForecastError>> {
    provider.map(|p| {
        p.fetch_profile(ticker.as_str())
            .map_err(|e| ForecastError::unavailable(ticker.as_str(), Stage::CompanyProfile, e))
    })
}

/// Errors from a fatal stage propagate; anything else becomes a warning line.
fn degrade(err: ForecastError) -> Result<String, ForecastError> {
    match err.stage() {
        Some(stage) if !stage.is_fatal() => Ok(err.to_string()),
        _ => Err(err),
    }
}

/// Build the dashboard for one ticker.
///
/// With `config.run.parallel` the price pipeline and the news/profile
/// collection run on separate rayon workers; they share only read-only input.
pub fn run_dashboard(
    ticker: &Ticker,
    collaborators: Collaborators<'_>,
    config: &DashboardConfig,
) -> Result<Dashboard, ForecastError> {
    info!(ticker = %ticker, parallel = config.run.parallel, "building dashboard");

    let secondary = || {
        (
            run_sentiment(ticker, collaborators.news, config),
            run_profile(ticker, collaborators.profile),
        )
    };
    let (price, (sentiment, profile)) = if config.run.parallel {
        rayon::join(|| run_price(ticker, collaborators.price, config), secondary)
    } else {
        (run_price(ticker, collaborators.price, config), secondary())
    };

    let (history, forecast, mut warnings) = price?;

    if history.source == DataSource::Synthetic {
        warnings.push("price history is synthetic; predictions are not meaningful".to_string());
    }
    if forecast.dropped_rows > 0 {
        warnings.push(format!(
            "{} price rows with missing fields were dropped",
            forecast.dropped_rows
        ));
    }

    let sentiment = match sentiment {
        Ok(report) => SentimentSection::Available(report),
        Err(gap) => {
            let reason = match gap {
                SentimentGap::NotConfigured(reason) => reason.to_string(),
                SentimentGap::Failed(e) => degrade(e)?,
            };
            warn!(ticker = %ticker, stage = %Stage::News, %reason, "sentiment unavailable");
            warnings.push(format!("sentiment unavailable: {reason}"));
            SentimentSection::Unavailable { reason }
        }
    };

    let profile = match profile {
        Some(Ok(profile)) => Some(profile),
        Some(Err(e)) => {
            let reason = degrade(e)?;
            warn!(ticker = %ticker, stage = %Stage::CompanyProfile, error = %reason, "profile unavailable");
            warnings.push(reason);
            None
        }
        None => None,
    };

    Ok(Dashboard {
        schema_version: SCHEMA_VERSION,
        ticker: ticker.clone(),
        generated_at: Utc::now(),
        history,
        forecast,
        sentiment,
        profile,
        warnings,
    })
}
