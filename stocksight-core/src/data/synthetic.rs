//! Synthetic price provider for offline development.
//!
//! Produces a deterministic random walk seeded from the symbol, weekdays only.
//! Results built on it are tagged `DataSource::Synthetic`.

use super::provider::{DataError, DataSource, FetchResult, PriceProvider};
use crate::domain::PriceBar;
use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    start_price: f64,
    max_daily_move: f64,
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self {
            start_price: 100.0,
            max_daily_move: 0.03,
        }
    }
}

impl SyntheticProvider {
    pub fn new(start_price: f64, max_daily_move: f64) -> Self {
        Self {
            start_price,
            max_daily_move: max_daily_move.abs(),
        }
    }

    pub fn generate(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<PriceBar> {
        let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
        let mut rng = StdRng::from_seed(seed);

        let mut bars = Vec::new();
        let mut price = self.start_price;

        for date in start.iter_days().take_while(|d| *d <= end) {
            if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                continue;
            }

            let daily_return: f64 = if self.max_daily_move > 0.0 {
                rng.gen_range(-self.max_daily_move..self.max_daily_move)
            } else {
                0.0
            };
            let open = price;
            let close = price * (1.0 + daily_return);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
            let volume = rng.gen_range(500_000..5_000_000u64) as f64;

            bars.push(PriceBar {
                date,
                open,
                high,
                low,
                close,
                volume,
            });
            price = close;
        }

        bars
    }
}

impl PriceProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let bars = self.generate(symbol, start, end);
        if bars.is_empty() {
            return Err(DataError::EmptyResponse {
                symbol: symbol.to_string(),
            });
        }
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::Synthetic,
            warnings: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn deterministic_per_symbol() {
        let p = SyntheticProvider::default();
        let a = p.generate("SPY", d(2024, 1, 1), d(2024, 3, 1));
        let b = p.generate("SPY", d(2024, 1, 1), d(2024, 3, 1));
        let c = p.generate("QQQ", d(2024, 1, 1), d(2024, 3, 1));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn weekdays_only_and_sane() {
        let bars = SyntheticProvider::default().generate("SPY", d(2024, 1, 1), d(2024, 1, 31));
        assert_eq!(bars.len(), 23);
        for b in &bars {
            assert!(!matches!(b.date.weekday(), Weekday::Sat | Weekday::Sun));
            assert!(b.high >= b.low);
            assert!(b.is_complete());
        }
    }

    #[test]
    fn empty_range_is_error() {
        let p = SyntheticProvider::default();
        // Saturday to Sunday.
        assert!(p.fetch("SPY", d(2024, 1, 6), d(2024, 1, 7)).is_err());
    }
}
