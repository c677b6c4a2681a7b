use crate::error::ForecastError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub date: NaiveDate,
    pub actual: f64,
    pub predicted: f64,
    /// `actual - predicted`, rounded to cents.
    pub difference: f64,
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Test-partition predictions paired with their dates, in split order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionSet {
    rows: Vec<PredictionResult>,
}

impl PredictionSet {
    /// Pair the three sequences positionally. No re-sorting is done.
    pub fn assemble(
        dates: &[NaiveDate],
        actual: &[f64],
        predicted: &[f64],
    ) -> Result<Self, ForecastError> {
        for (context, len) in [("assemble actual", actual.len()), ("assemble predicted", predicted.len())] {
            if len != dates.len() {
                return Err(ForecastError::ShapeMismatch {
                    context,
                    expected: dates.len(),
                    found: len,
                });
            }
        }

        let rows = dates
            .iter()
            .zip(actual)
            .zip(predicted)
            .map(|((date, actual), predicted)| PredictionResult {
                date: *date,
                actual: *actual,
                predicted: *predicted,
                difference: round_cents(actual - predicted),
            })
            .collect();
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[PredictionResult] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Last test row, for "current vs predicted" display.
    pub fn latest(&self) -> Option<&PredictionResult> {
        self.rows.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PredictionResult> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a PredictionSet {
    type Item = &'a PredictionResult;
    type IntoIter = std::slice::Iter<'a, PredictionResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
