//! Property tests for pipeline invariants.
//!
//! Uses proptest to verify:
//! 1. Split counts: train + test == N, both non-empty, test == N - floor(0.8N)
//! 2. Split order: train dates then test dates reproduce the series
//! 3. MSE is non-negative and zero on identical input
//! 4. Sentiment buckets sum to the headline count
//! 5. Polarity stays within [-1, 1]

use chrono::NaiveDate;
use proptest::prelude::*;
use stocksight_core::domain::{PriceBar, PriceSeries, ScoredHeadline};
use stocksight_core::features::FeatureBuilder;
use stocksight_core::model::mean_squared_error;
use stocksight_core::sentiment::{breakdown, summarize, LexiconScorer, PolarityScorer};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (10.0..500.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_series() -> impl Strategy<Value = PriceSeries> {
    prop::collection::vec((arb_price(), 0u32..5), 2..120).prop_map(|rows| {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let mut date = start;
        let bars = rows
            .into_iter()
            .map(|(close, gap)| {
                date += chrono::Duration::days(1 + i64::from(gap));
                PriceBar {
                    date,
                    open: close,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 1000.0,
                }
            })
            .collect();
        PriceSeries::from_bars(bars)
    })
}

const WORDS: &[&str] = &[
    "company", "beats", "misses", "not", "very", "profit", "loss", "shares", "fall", "surge",
    "extremely", "bearish", "quarter", "record",
];

fn arb_title() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(WORDS), 0..12).prop_map(|w| w.join(" "))
}

// ── 1-2. Split ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn split_counts(series in arb_series()) {
        let n = series.len();
        let split = FeatureBuilder::default().build(&series).unwrap();
        prop_assert_eq!(split.train_len() + split.test_len(), n);
        prop_assert!(split.train_len() >= 1);
        prop_assert!(split.test_len() >= 1);
        let floor = (0.8 * n as f64).floor() as usize;
        if floor >= 1 && floor < n {
            prop_assert_eq!(split.test_len(), n - floor);
        }
    }

    #[test]
    fn split_preserves_order(series in arb_series()) {
        let split = FeatureBuilder::default().build(&series).unwrap();
        let rejoined: Vec<NaiveDate> = split
            .train_dates
            .iter()
            .chain(&split.test_dates)
            .copied()
            .collect();
        let original: Vec<NaiveDate> = series.bars().iter().map(|b| b.date).collect();
        prop_assert_eq!(rejoined, original);
    }

    #[test]
    fn split_honours_fraction(series in arb_series(), fraction in 0.05..0.95_f64) {
        let builder = FeatureBuilder::new(fraction).unwrap();
        let split = builder.build(&series).unwrap();
        prop_assert_eq!(split.train_len(), builder.split_index(series.len()));
    }
}

// ── 3. MSE ───────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn mse_non_negative(pairs in prop::collection::vec((arb_price(), arb_price()), 0..50)) {
        let (actual, predicted): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        let mse = mean_squared_error(&actual, &predicted).unwrap();
        prop_assert!(mse >= 0.0);
        prop_assert_eq!(mean_squared_error(&actual, &actual).unwrap(), 0.0);
    }
}

// ── 4-5. Sentiment ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn buckets_sum_to_count(polarities in prop::collection::vec(-1.0..=1.0_f64, 0..40)) {
        let scored: Vec<ScoredHeadline> = polarities
            .iter()
            .map(|p| ScoredHeadline { title: String::new(), polarity: *p })
            .collect();
        prop_assert_eq!(breakdown(&scored).total(), scored.len());
        let summary = summarize(&scored);
        prop_assert_eq!(summary.headline_count, scored.len());
        prop_assert!(summary.average_polarity.abs() <= 1.0);
    }

    #[test]
    fn polarity_bounded(title in arb_title()) {
        let p = LexiconScorer::new().polarity(&title);
        prop_assert!((-1.0..=1.0).contains(&p));
    }

    #[test]
    fn negation_flips(word in prop::sample::select(&["profit", "loss", "surge", "fall"][..])) {
        let scorer = LexiconScorer::new();
        let plain = scorer.polarity(word);
        let negated = scorer.polarity(&format!("not {word}"));
        prop_assert!((plain + negated).abs() < 1e-12);
    }
}
