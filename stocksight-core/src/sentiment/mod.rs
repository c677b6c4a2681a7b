//! Headline sentiment: per-title polarity and the aggregate label.

pub mod lexicon;
pub mod scorer;

pub use lexicon::LexiconScorer;
pub use scorer::{breakdown, summarize, SentimentScorer};

/// Maps free text to a polarity in [-1, 1].
///
/// Negative is pessimistic, positive optimistic, zero neutral or no signal.
pub trait PolarityScorer: Send + Sync {
    fn polarity(&self, text: &str) -> f64;
}
