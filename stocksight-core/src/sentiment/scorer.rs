use super::{LexiconScorer, PolarityScorer};
use crate::domain::{
    Headline, ScoredHeadline, SentimentBreakdown, SentimentLabel, SentimentSummary,
};

/// Scores headlines with a [`PolarityScorer`] and aggregates the result.
#[derive(Debug, Clone, Default)]
pub struct SentimentScorer<S = LexiconScorer> {
    measure: S,
}

impl<S: PolarityScorer> SentimentScorer<S> {
    pub fn new(measure: S) -> Self {
        Self { measure }
    }

    /// One score per headline, in input order.
    pub fn score(&self, headlines: &[Headline]) -> Vec<ScoredHeadline> {
        headlines
            .iter()
            .map(|h| {
                let polarity = self.measure.polarity(&h.title);
                ScoredHeadline {
                    title: h.title.clone(),
                    polarity: if polarity.is_finite() {
                        polarity.clamp(-1.0, 1.0)
                    } else {
                        0.0
                    },
                }
            })
            .collect()
    }

    /// Mean polarity and its label. Empty input yields [`SentimentSummary::no_news`].
    pub fn summarize(&self, scored: &[ScoredHeadline]) -> SentimentSummary {
        summarize(scored)
    }

    pub fn breakdown(&self, scored: &[ScoredHeadline]) -> SentimentBreakdown {
        breakdown(scored)
    }
}

pub fn summarize(scored: &[ScoredHeadline]) -> SentimentSummary {
    if scored.is_empty() {
        return SentimentSummary::no_news();
    }
    let average_polarity =
        scored.iter().map(|s| s.polarity).sum::<f64>() / scored.len() as f64;
    SentimentSummary {
        label: SentimentLabel::from_polarity(average_polarity),
        average_polarity,
        headline_count: scored.len(),
    }
}

/// Per-headline bucket counts, independent of the aggregate label.
pub fn breakdown(scored: &[ScoredHeadline]) -> SentimentBreakdown {
    scored
        .iter()
        .fold(SentimentBreakdown::default(), |mut acc, s| {
            match s.label() {
                SentimentLabel::Positive => acc.positive += 1,
                SentimentLabel::Negative => acc.negative += 1,
                SentimentLabel::Neutral | SentimentLabel::NoNews => acc.neutral += 1,
            }
            acc
        })
}
