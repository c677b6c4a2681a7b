//! Yahoo Finance price provider.
//!
//! Fetches daily OHLCV bars from Yahoo's v8 chart API. Handles rate limiting,
//! retries with exponential backoff, response parsing, and the circuit breaker.
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes. The CSV import path is the fallback when Yahoo is unavailable.

use super::circuit_breaker::CircuitBreaker;
use super::provider::{DataError, DataSource, FetchResult, PriceProvider};
use crate::domain::PriceBar;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub const YAHOO_CHART_BASE: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

pub(crate) const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Blocking client shared by the HTTP providers.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::blocking::Client, DataError> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(BROWSER_USER_AGENT)
        .build()
        .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))
}

/// Exponential backoff before retry `attempt` (1-based); saturates instead of overflowing.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
}

pub struct YahooProvider {
    client: reqwest::blocking::Client,
    circuit_breaker: Arc<CircuitBreaker>,
    base_url: String,
    max_retries: u32,
    base_delay: Duration,
}

impl YahooProvider {
    pub fn new(circuit_breaker: Arc<CircuitBreaker>, timeout: Duration) -> Result<Self, DataError> {
        Ok(Self {
            client: http_client(timeout)?,
            circuit_breaker,
            base_url: YAHOO_CHART_BASE.to_string(),
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        })
    }

    /// Point the provider at a different chart endpoint (mirrors, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn chart_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        // period2 is exclusive; cover all of `end`.
        let end_ts = end.and_time(NaiveTime::MIN).and_utc().timestamp() + 86_400;
        format!(
            "{}/{symbol}?period1={start_ts}&period2={end_ts}&interval=1d&includeAdjustedClose=true",
            self.base_url
        )
    }

    /// Parse a chart API payload into bars. Missing fields become `NaN`;
    /// rows where every field is missing (holidays) are skipped.
    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<Vec<PriceBar>, DataError> {
        let result = resp.chart.result.ok_or_else(|| match resp.chart.error {
            Some(err) if err.code == "Not Found" => DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            },
            Some(err) => {
                DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
            }
            None => DataError::ResponseFormatChanged("empty result with no error".into()),
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            })?;

        // A known symbol with no trading days in range has no timestamps.
        let timestamps = data.timestamp.unwrap_or_default();

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let mut bars = Vec::with_capacity(timestamps.len());

        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            let field = |v: &Vec<Option<f64>>| v.get(i).copied().flatten();
            let (open, high, low, close, volume) = (
                field(&quote.open),
                field(&quote.high),
                field(&quote.low),
                field(&quote.close),
                field(&quote.volume),
            );

            if open.is_none()
                && high.is_none()
                && low.is_none()
                && close.is_none()
                && volume.is_none()
            {
                continue;
            }

            bars.push(PriceBar {
                date,
                open: open.unwrap_or(f64::NAN),
                high: high.unwrap_or(f64::NAN),
                low: low.unwrap_or(f64::NAN),
                close: close.unwrap_or(f64::NAN),
                volume: volume.unwrap_or(f64::NAN),
            });
        }

        if bars.is_empty() {
            return Err(DataError::EmptyResponse {
                symbol: symbol.to_string(),
            });
        }

        Ok(bars)
    }

    fn fetch_with_retry(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, DataError> {
        if !self.circuit_breaker.is_allowed() {
            return Err(DataError::CircuitBreakerTripped);
        }

        let url = self.chart_url(symbol, start, end);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = backoff_delay(self.base_delay, attempt);
                debug!(symbol, attempt, ?delay, "retrying chart request");
                std::thread::sleep(delay);
            }

            if !self.circuit_breaker.is_allowed() {
                return Err(DataError::CircuitBreakerTripped);
            }

            let resp = match self.client.get(&url).send() {
                Ok(resp) => resp,
                Err(e) => {
                    let err = DataError::from_transport(&e);
                    if err.is_transient() {
                        warn!(symbol, attempt, error = %e, "chart request failed");
                        last_error = Some(err);
                        continue;
                    }
                    return Err(err);
                }
            };

            let status = resp.status();

            if status == reqwest::StatusCode::FORBIDDEN {
                self.circuit_breaker.trip();
                return Err(DataError::CircuitBreakerTripped);
            }

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                self.circuit_breaker.record_failure();
                let retry_after = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                last_error = Some(DataError::RateLimited {
                    retry_after_secs: retry_after,
                });
                continue;
            }

            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Err(DataError::AuthenticationRequired(
                    "Yahoo Finance requires authentication".into(),
                ));
            }

            // Unknown symbols come back as 404 with a chart.error body.
            if !status.is_success() && status != reqwest::StatusCode::NOT_FOUND {
                self.circuit_breaker.record_failure();
                last_error = Some(DataError::Other(format!("HTTP {status} for {symbol}")));
                continue;
            }

            let chart: ChartResponse = resp.json().map_err(|e| {
                DataError::ResponseFormatChanged(format!(
                    "failed to parse response for {symbol}: {e}"
                ))
            })?;

            let bars = Self::parse_response(symbol, chart)?;
            self.circuit_breaker.record_success();
            return Ok(bars);
        }

        Err(last_error.unwrap_or_else(|| DataError::Other("max retries exceeded".into())))
    }
}

impl PriceProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let bars = self.fetch_with_retry(symbol, start, end)?;
        debug!(symbol, rows = bars.len(), "fetched chart data");
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::YahooFinance,
            warnings: Vec::new(),
        })
    }

    fn is_available(&self) -> bool {
        self.circuit_breaker.is_allowed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Vec<PriceBar>, DataError> {
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        YahooProvider::parse_response("TEST", resp)
    }

    #[test]
    fn parses_bars_and_marks_missing_fields() {
        let json = r#"{"chart":{"result":[{
            "timestamp":[1704205800,1704292200,1704378600],
            "indicators":{"quote":[{
                "open":[100.0,101.0,null],
                "high":[102.0,null,null],
                "low":[99.0,100.0,null],
                "close":[101.0,102.0,null],
                "volume":[1000,1100,null]
            }]}
        }],"error":null}}"#;

        let bars = parse(json).unwrap();
        // The all-null third row is a holiday and is skipped.
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert!(bars[0].is_complete());
        assert!(bars[1].high.is_nan());
        assert!(!bars[1].is_complete());
    }

    #[test]
    fn not_found_maps_to_symbol_not_found() {
        let json = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert!(matches!(
            parse(json),
            Err(DataError::SymbolNotFound { .. })
        ));
    }

    #[test]
    fn no_timestamps_is_empty_response() {
        let json = r#"{"chart":{"result":[{"indicators":{"quote":[{}]}}],"error":null}}"#;
        assert!(matches!(parse(json), Err(DataError::EmptyResponse { .. })));
    }

    #[test]
    fn chart_url_covers_end_day() {
        let provider = YahooProvider::new(
            Arc::new(CircuitBreaker::default_provider()),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_base_url("http://localhost/chart");
        let url = provider.chart_url(
            "AAPL",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        assert_eq!(
            url,
            "http://localhost/chart/AAPL?period1=1704067200&period2=1704153600&interval=1d&includeAdjustedClose=true"
        );
    }

    #[test]
    fn backoff_doubles_and_saturates() {
        let base = Duration::from_millis(500);
        assert_eq!(backoff_delay(base, 1), base);
        assert_eq!(backoff_delay(base, 3), Duration::from_secs(2));
        assert_eq!(backoff_delay(base, 40), base.saturating_mul(u32::MAX));
    }
}
