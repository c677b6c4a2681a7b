//! Price bars and the cleaned, date-ordered series built from them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV bar for one ticker.
///
/// Providers are not trusted to deliver complete rows: a field the upstream
/// left empty is carried as `NaN` until the feature builder drops the row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    /// True if every OHLCV field holds a finite value.
    pub fn is_complete(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite()
    }
}

/// Price history for a single ticker: strictly increasing dates, no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Build a series from untrusted bars.
    ///
    /// Bars are stably sorted by date and de-duplicated, keeping the first
    /// occurrence of each date. Incomplete bars are kept here; dropping them is
    /// the feature builder's job so the drop can be counted.
    pub fn from_bars(mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);
        Self { bars }
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    /// Number of bars with every field present.
    pub fn complete_count(&self) -> usize {
        self.bars.iter().filter(|b| b.is_complete()).count()
    }

    pub fn into_bars(self) -> Vec<PriceBar> {
        self.bars
    }
}
