//! Headline and sentiment value types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Polarity above this is Positive, below its negation Negative. Both bounds
/// are exclusive.
pub const POLARITY_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    pub published_at: Option<DateTime<Utc>>,
}

impl Headline {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            published_at: None,
        }
    }

    pub fn published(mut self, at: DateTime<Utc>) -> Self {
        self.published_at = Some(at);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredHeadline {
    pub title: String,
    /// Sentiment valence in [-1, 1].
    pub polarity: f64,
}

impl ScoredHeadline {
    pub fn label(&self) -> SentimentLabel {
        SentimentLabel::from_polarity(self.polarity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
    /// No headlines were available; treated as neutral.
    NoNews,
}

impl SentimentLabel {
    /// Threshold rule shared by the aggregate label and per-headline buckets.
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > POLARITY_THRESHOLD {
            SentimentLabel::Positive
        } else if polarity < -POLARITY_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn is_neutral(self) -> bool {
        matches!(self, SentimentLabel::Neutral | SentimentLabel::NoNews)
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::NoNews => "No news available",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub label: SentimentLabel,
    pub average_polarity: f64,
    pub headline_count: usize,
}

impl SentimentSummary {
    pub fn no_news() -> Self {
        Self {
            label: SentimentLabel::NoNews,
            average_polarity: 0.0,
            headline_count: 0,
        }
    }
}

/// Per-headline bucket counts for histogram display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentBreakdown {
    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}
