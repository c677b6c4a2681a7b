//! Pipeline-level error taxonomy.
//!
//! Transport failures are described by [`DataError`]; everything the
//! analytical pipeline reports to its caller is a [`ForecastError`], which
//! carries enough context (ticker, stage) to tell a fatal price-pipeline
//! failure apart from a degradable sentiment or profile failure.

use crate::data::DataError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which external collaborator a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    PriceHistory,
    News,
    CompanyProfile,
}

impl Stage {
    /// Whether a failure at this stage must abort the whole request.
    pub fn is_fatal(self) -> bool {
        matches!(self, Stage::PriceHistory)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::PriceHistory => "price history",
            Stage::News => "news",
            Stage::CompanyProfile => "company profile",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ForecastError {
    /// No usable data from an external source: unknown ticker, network
    /// failure, timeout, or an empty response.
    #[error("{stage} unavailable for '{ticker}': {source}")]
    DataUnavailable {
        ticker: String,
        stage: Stage,
        #[source]
        source: DataError,
    },

    #[error("insufficient data: {rows} usable price rows, need at least {required}")]
    InsufficientData { rows: usize, required: usize },

    /// Array-length mismatch between parallel sequences.
    #[error("shape mismatch in {context}: expected {expected}, found {found}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("invalid ticker symbol: {0:?}")]
    InvalidTicker(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ForecastError {
    pub fn unavailable(ticker: impl Into<String>, stage: Stage, source: DataError) -> Self {
        Self::DataUnavailable {
            ticker: ticker.into(),
            stage,
            source,
        }
    }

    /// The stage of a `DataUnavailable` error, if this is one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::DataUnavailable { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
