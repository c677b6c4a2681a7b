use super::provider::{DataError, DataSource, PriceProvider};
use crate::domain::{PriceSeries, Ticker};
use crate::error::{ForecastError, Stage};
use chrono::NaiveDate;
use tracing::info;

/// First day of the default history window.
pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2015, 1, 1).unwrap_or_default()
}

/// A loaded series plus where it came from.
#[derive(Debug, Clone)]
pub struct PriceHistory {
    pub series: PriceSeries,
    pub source: DataSource,
    pub warnings: Vec<String>,
}

/// Price history for one ticker, from a fixed start date through today.
///
/// Whatever the provider returns is sorted and de-duplicated here; an empty
/// or failed fetch is a `DataUnavailable` error at the `PriceHistory` stage.
pub struct PriceSeriesSource<'a> {
    provider: &'a dyn PriceProvider,
    start: NaiveDate,
}

impl<'a> PriceSeriesSource<'a> {
    pub fn new(provider: &'a dyn PriceProvider) -> Self {
        Self {
            provider,
            start: default_start_date(),
        }
    }

    pub fn with_start(mut self, start: NaiveDate) -> Self {
        self.start = start;
        self
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn fetch(&self, ticker: &Ticker) -> Result<PriceHistory, ForecastError> {
        self.fetch_until(ticker, chrono::Local::now().date_naive())
    }

    pub fn fetch_until(
        &self,
        ticker: &Ticker,
        end: NaiveDate,
    ) -> Result<PriceHistory, ForecastError> {
        let unavailable = |e: DataError| ForecastError::unavailable(ticker.as_str(), Stage::PriceHistory, e);

        let fetched = self
            .provider
            .fetch(ticker.as_str(), self.start, end)
            .map_err(unavailable)?;
        let source = fetched.source;
        let warnings = fetched.warnings;
        let series = PriceSeries::from_bars(fetched.bars);

        if series.is_empty() {
            return Err(unavailable(DataError::EmptyResponse {
                symbol: ticker.to_string(),
            }));
        }

        info!(
            ticker = %ticker,
            provider = self.provider.name(),
            rows = series.len(),
            "price history loaded"
        );
        Ok(PriceHistory {
            series,
            source,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::provider::FetchResult;
    use crate::domain::PriceBar;

    struct FixedProvider(Vec<PriceBar>);

    impl PriceProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        fn fetch(&self, symbol: &str, _: NaiveDate, _: NaiveDate) -> Result<FetchResult, DataError> {
            Ok(FetchResult {
                symbol: symbol.to_string(),
                bars: self.0.clone(),
                source: DataSource::CsvImport,
                warnings: Vec::new(),
            })
        }
    }

    struct DownProvider;

    impl PriceProvider for DownProvider {
        fn name(&self) -> &str {
            "down"
        }

        fn fetch(&self, _: &str, _: NaiveDate, _: NaiveDate) -> Result<FetchResult, DataError> {
            Err(DataError::NetworkUnreachable("connection refused".into()))
        }
    }

    fn bar(day: u32) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
            volume: 10.0,
        }
    }

    #[test]
    fn default_window_starts_2015() {
        let provider = DownProvider;
        let source = PriceSeriesSource::new(&provider);
        assert_eq!(source.start(), NaiveDate::from_ymd_opt(2015, 1, 1).unwrap());
    }

    #[test]
    fn output_is_sorted_and_deduplicated() {
        let provider = FixedProvider(vec![bar(3), bar(1), bar(3), bar(2)]);
        let ticker = Ticker::parse("spy").unwrap();
        let history = PriceSeriesSource::new(&provider).fetch(&ticker).unwrap();
        let series = &history.series;
        assert_eq!(series.len(), 3);
        assert_eq!(history.source, DataSource::CsvImport);
        assert!(history.warnings.is_empty());
        assert!(series.bars().windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn empty_fetch_is_unavailable() {
        let provider = FixedProvider(vec![]);
        let ticker = Ticker::parse("spy").unwrap();
        let err = PriceSeriesSource::new(&provider).fetch(&ticker).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::PriceHistory));
    }

    #[test]
    fn provider_failure_propagates_with_context() {
        let ticker = Ticker::parse("aapl").unwrap();
        let err = PriceSeriesSource::new(&DownProvider).fetch(&ticker).unwrap_err();
        match err {
            ForecastError::DataUnavailable {
                ticker,
                stage,
                source,
            } => {
                assert_eq!(ticker, "AAPL");
                assert_eq!(stage, Stage::PriceHistory);
                assert!(matches!(source, DataError::NetworkUnreachable(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
