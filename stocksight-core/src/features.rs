//! Feature rows and the chronological train/test split.

use crate::domain::{PriceBar, PriceSeries};
use crate::error::ForecastError;
use chrono::{Datelike, NaiveDate};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TRAIN_FRACTION: f64 = 0.8;

/// Complete rows needed to produce non-empty train and test partitions.
pub const MIN_ROWS: usize = 2;

pub const FEATURE_NAMES: [&str; FeatureRow::WIDTH] =
    ["open", "high", "low", "volume", "day", "month", "year"];

/// Model inputs derived from one bar. The target is that bar's close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub volume: f64,
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl FeatureRow {
    pub const WIDTH: usize = 7;

    pub fn from_bar(bar: &PriceBar) -> Self {
        Self {
            open: bar.open,
            high: bar.high,
            low: bar.low,
            volume: bar.volume,
            day: bar.date.day(),
            month: bar.date.month(),
            year: bar.date.year(),
        }
    }

    pub fn to_array(&self) -> [f64; Self::WIDTH] {
        [
            self.open,
            self.high,
            self.low,
            self.volume,
            f64::from(self.day),
            f64::from(self.month),
            f64::from(self.year),
        ]
    }
}

/// Stack rows into an `n x 7` design matrix.
pub fn design_matrix(rows: &[FeatureRow]) -> Array2<f64> {
    Array2::from_shape_fn((rows.len(), FeatureRow::WIDTH), |(i, j)| {
        rows[i].to_array()[j]
    })
}

/// Contiguous earlier block for training, later block for testing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub train_features: Vec<FeatureRow>,
    pub train_targets: Vec<f64>,
    pub train_dates: Vec<NaiveDate>,
    pub test_features: Vec<FeatureRow>,
    pub test_targets: Vec<f64>,
    pub test_dates: Vec<NaiveDate>,
    /// Bars discarded for having a missing field.
    pub dropped_rows: usize,
}

impl Split {
    pub fn train_len(&self) -> usize {
        self.train_features.len()
    }

    pub fn test_len(&self) -> usize {
        self.test_features.len()
    }

    pub fn train_matrix(&self) -> Array2<f64> {
        design_matrix(&self.train_features)
    }

    pub fn test_matrix(&self) -> Array2<f64> {
        design_matrix(&self.test_features)
    }

    pub fn train_target_array(&self) -> Array1<f64> {
        Array1::from(self.train_targets.clone())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FeatureBuilder {
    train_fraction: f64,
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self {
            train_fraction: DEFAULT_TRAIN_FRACTION,
        }
    }
}

impl FeatureBuilder {
    pub fn new(train_fraction: f64) -> Result<Self, ForecastError> {
        if !(train_fraction > 0.0 && train_fraction < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "train fraction must lie in (0, 1), got {train_fraction}"
            )));
        }
        Ok(Self { train_fraction })
    }

    pub fn train_fraction(&self) -> f64 {
        self.train_fraction
    }

    /// `floor(fraction * n)`, clamped so both partitions are non-empty.
    pub fn split_index(&self, n: usize) -> usize {
        let raw = (self.train_fraction * n as f64).floor() as usize;
        raw.clamp(1, n.saturating_sub(1).max(1))
    }

    /// Drop incomplete bars, derive one row per bar in date order, and split.
    pub fn build(&self, series: &PriceSeries) -> Result<Split, ForecastError> {
        let complete: Vec<&PriceBar> = series.bars().iter().filter(|b| b.is_complete()).collect();
        let n = complete.len();
        if n < MIN_ROWS {
            return Err(ForecastError::InsufficientData {
                rows: n,
                required: MIN_ROWS,
            });
        }

        let at = self.split_index(n);
        let (train, test) = complete.split_at(at);
        let unzip = |bars: &[&PriceBar]| -> (Vec<FeatureRow>, Vec<f64>, Vec<NaiveDate>) {
            let features = bars.iter().map(|b| FeatureRow::from_bar(b)).collect();
            let targets = bars.iter().map(|b| b.close).collect();
            let dates = bars.iter().map(|b| b.date).collect();
            (features, targets, dates)
        };
        let (train_features, train_targets, train_dates) = unzip(train);
        let (test_features, test_targets, test_dates) = unzip(test);

        Ok(Split {
            train_features,
            train_targets,
            train_dates,
            test_features,
            test_targets,
            test_dates,
            dropped_rows: series.len() - n,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(n: usize) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceSeries::from_bars(
            (0..n)
                .map(|i| {
                    let p = 100.0 + i as f64;
                    PriceBar {
                        date: start + chrono::Duration::days(i as i64),
                        open: p,
                        high: p + 1.0,
                        low: p - 1.0,
                        close: p + 0.5,
                        volume: 1000.0,
                    }
                })
                .collect(),
        )
    }

    #[test]
    fn ten_rows_split_eight_two() {
        let split = FeatureBuilder::default().build(&series(10)).unwrap();
        assert_eq!(split.train_len(), 8);
        assert_eq!(split.test_len(), 2);
        assert_eq!(split.test_dates[0], NaiveDate::from_ymd_opt(2024, 1, 9).unwrap());
        assert_eq!(split.dropped_rows, 0);
    }

    #[test]
    fn date_parts_are_decomposed() {
        let split = FeatureBuilder::default().build(&series(3)).unwrap();
        let row = split.train_features[0];
        assert_eq!((row.day, row.month, row.year), (1, 1, 2024));
        assert_eq!(split.train_targets[0], 100.5);
    }

    #[test]
    fn incomplete_bars_are_dropped() {
        let mut bars = series(5).into_bars();
        bars[2].volume = f64::NAN;
        let split = FeatureBuilder::default()
            .build(&PriceSeries::from_bars(bars))
            .unwrap();
        assert_eq!(split.dropped_rows, 1);
        assert_eq!(split.train_len() + split.test_len(), 4);
        assert!(!split
            .train_dates
            .iter()
            .chain(&split.test_dates)
            .any(|d| *d == NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()));
    }

    #[test]
    fn fewer_than_two_rows_is_insufficient() {
        let err = FeatureBuilder::default().build(&series(1)).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::InsufficientData { rows: 1, required: 2 }
        ));
    }

    #[test]
    fn split_index_is_clamped() {
        let b = FeatureBuilder::default();
        assert_eq!(b.split_index(2), 1);
        assert_eq!(b.split_index(3), 2);
        assert_eq!(FeatureBuilder::new(0.01).unwrap().split_index(10), 1);
        assert_eq!(FeatureBuilder::new(0.99).unwrap().split_index(10), 9);
    }

    #[test]
    fn fraction_must_be_open_interval() {
        assert!(FeatureBuilder::new(0.0).is_err());
        assert!(FeatureBuilder::new(1.0).is_err());
        assert!(FeatureBuilder::new(f64::NAN).is_err());
    }

    #[test]
    fn design_matrix_shape() {
        let split = FeatureBuilder::default().build(&series(10)).unwrap();
        let x = split.train_matrix();
        assert_eq!(x.dim(), (8, FeatureRow::WIDTH));
        assert_eq!(x[[0, 6]], 2024.0);
    }
}
