//! The two independent analytical pipelines.
//!
//! Price: series -> features -> fit -> predict -> assemble.
//! Sentiment: headlines -> per-title polarity -> summary and buckets.
//! Neither depends on the other's output.

use crate::domain::{
    Headline, PriceSeries, ScoredHeadline, SentimentBreakdown, SentimentSummary,
};
use crate::error::ForecastError;
use crate::features::FeatureBuilder;
use crate::model::{ModelReport, PricePredictor};
use crate::results::PredictionSet;
use crate::sentiment::{PolarityScorer, SentimentScorer};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceForecast {
    pub predictions: PredictionSet,
    pub model: ModelReport,
    pub dropped_rows: usize,
}

pub fn forecast_prices(
    series: &PriceSeries,
    builder: &FeatureBuilder,
) -> Result<PriceForecast, ForecastError> {
    let split = builder.build(series)?;
    let predictor = PricePredictor;
    let model = predictor.fit(&split.train_features, &split.train_targets)?;
    let predicted = predictor.predict(&model, &split.test_features)?;
    let mse = predictor.evaluate(&split.test_targets, &predicted)?;
    let predictions = PredictionSet::assemble(&split.test_dates, &split.test_targets, &predicted)?;

    debug!(
        train = split.train_len(),
        test = split.test_len(),
        dropped = split.dropped_rows,
        mse,
        r_squared = model.r_squared(),
        "price model fitted"
    );

    Ok(PriceForecast {
        model: predictor.report(&model, mse, split.train_len(), split.test_len()),
        predictions,
        dropped_rows: split.dropped_rows,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentReport {
    pub headlines: Vec<ScoredHeadline>,
    pub summary: SentimentSummary,
    pub breakdown: SentimentBreakdown,
}

pub fn analyze_headlines<S: PolarityScorer>(
    headlines: &[Headline],
    scorer: &SentimentScorer<S>,
) -> SentimentReport {
    let scored = scorer.score(headlines);
    SentimentReport {
        summary: scorer.summarize(&scored),
        breakdown: scorer.breakdown(&scored),
        headlines: scored,
    }
}
