//! Rule-based financial word lexicon.

use super::PolarityScorer;
use std::collections::{HashMap, HashSet};

const POSITIVE: &[(&str, f64)] = &[
    ("bullish", 0.8),
    ("surge", 0.7),
    ("rally", 0.7),
    ("soar", 0.8),
    ("gain", 0.5),
    ("profit", 0.6),
    ("growth", 0.6),
    ("rise", 0.5),
    ("increase", 0.5),
    ("improve", 0.5),
    ("outperform", 0.7),
    ("beat", 0.6),
    ("exceed", 0.6),
    ("strong", 0.5),
    ("positive", 0.5),
    ("optimistic", 0.6),
    ("confident", 0.5),
    ("record", 0.6),
    ("upgrade", 0.6),
    ("buy", 0.5),
    ("breakout", 0.6),
    ("recovery", 0.5),
    ("rebound", 0.5),
    ("win", 0.5),
    ("success", 0.6),
    ("boost", 0.5),
    ("jump", 0.6),
    ("climb", 0.5),
];

const NEGATIVE: &[(&str, f64)] = &[
    ("bearish", -0.8),
    ("crash", -0.9),
    ("plunge", -0.8),
    ("drop", -0.6),
    ("fall", -0.5),
    ("decline", -0.6),
    ("loss", -0.6),
    ("decrease", -0.5),
    ("weak", -0.5),
    ("negative", -0.5),
    ("pessimistic", -0.6),
    ("concern", -0.5),
    ("worry", -0.5),
    ("fear", -0.6),
    ("risk", -0.4),
    ("volatile", -0.3),
    ("uncertainty", -0.5),
    ("miss", -0.6),
    ("disappoint", -0.7),
    ("underperform", -0.6),
    ("downgrade", -0.6),
    ("sell", -0.5),
    ("slump", -0.7),
    ("crisis", -0.8),
    ("warning", -0.5),
    ("lawsuit", -0.6),
    ("fail", -0.7),
    ("fraud", -0.9),
    ("layoff", -0.6),
    ("recall", -0.5),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "cannot", "cant", "dont", "doesnt", "didnt", "wont", "isnt",
    "arent", "wasnt", "werent", "hardly", "barely", "without",
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.5),
    ("extremely", 2.0),
    ("highly", 1.5),
    ("significantly", 1.5),
    ("sharply", 1.5),
    ("dramatically", 1.8),
    ("massively", 1.8),
    ("slightly", 0.5),
    ("somewhat", 0.7),
    ("marginally", 0.5),
];

const SUFFIXES: &[&str] = &["s", "es", "ed", "d", "ing"];

/// Lexicon polarity: mean of matched word scores, clamped to [-1, 1].
///
/// A negation flips the sign of the next scored word and an intensifier
/// scales it. Text with no lexicon words scores 0.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    words: HashMap<String, f64>,
    negations: HashSet<String>,
    intensifiers: HashMap<String, f64>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            words: POSITIVE
                .iter()
                .chain(NEGATIVE)
                .map(|(w, s)| ((*w).to_string(), *s))
                .collect(),
            negations: NEGATIONS.iter().map(|w| (*w).to_string()).collect(),
            intensifiers: INTENSIFIERS
                .iter()
                .map(|(w, m)| ((*w).to_string(), *m))
                .collect(),
        }
    }

    /// Add or override a word. The score is clamped to [-1, 1].
    pub fn with_word(mut self, word: &str, score: f64) -> Self {
        self.words
            .insert(word.to_lowercase(), score.clamp(-1.0, 1.0));
        self
    }

    /// Exact match first, then with a common inflection stripped.
    fn lookup(&self, token: &str) -> Option<f64> {
        if let Some(score) = self.words.get(token) {
            return Some(*score);
        }
        SUFFIXES.iter().find_map(|suffix| {
            let stem = token.strip_suffix(suffix)?;
            if stem.len() < 3 {
                return None;
            }
            self.words.get(stem).copied()
        })
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(|raw| {
            raw.chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|t| !t.is_empty())
}

impl PolarityScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> f64 {
        let mut total = 0.0;
        let mut matched = 0usize;
        let mut negate = false;
        let mut multiplier = 1.0;

        for token in tokens(text) {
            if self.negations.contains(&token) {
                negate = true;
                continue;
            }
            if let Some(m) = self.intensifiers.get(&token) {
                multiplier = *m;
                continue;
            }
            if let Some(mut score) = self.lookup(&token) {
                if negate {
                    score = -score;
                }
                total += score * multiplier;
                matched += 1;
                negate = false;
                multiplier = 1.0;
            }
        }

        if matched == 0 {
            return 0.0;
        }
        (total / matched as f64).clamp(-1.0, 1.0)
    }
}
