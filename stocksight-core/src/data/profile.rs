//! Company profile lookup.
//!
//! Every descriptive field is optional upstream. A field that is absent stays
//! `None`; a request that fails outright is a typed [`DataError`] so the
//! caller decides whether to degrade the display.

use super::circuit_breaker::CircuitBreaker;
use super::provider::DataError;
use super::yahoo::http_client;
use crate::domain::CompanyProfile;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

pub const YAHOO_SUMMARY_BASE: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";

pub trait ProfileProvider: Send + Sync {
    fn name(&self) -> &str;

    fn fetch_profile(&self, symbol: &str) -> Result<CompanyProfile, DataError>;
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: SummaryResult,
}

#[derive(Debug, Deserialize)]
struct SummaryResult {
    result: Option<Vec<SummaryModules>>,
    error: Option<SummaryError>,
}

#[derive(Debug, Deserialize)]
struct SummaryError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryModules {
    asset_profile: Option<AssetProfile>,
    price: Option<PriceModule>,
}

#[derive(Debug, Deserialize)]
struct AssetProfile {
    sector: Option<String>,
    industry: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    long_name: Option<String>,
    market_cap: Option<RawNumber>,
}

/// Yahoo wraps numbers as `{"raw": 123, "fmt": "123"}`.
#[derive(Debug, Deserialize)]
struct RawNumber {
    raw: Option<f64>,
}

pub struct YahooProfileProvider {
    client: reqwest::blocking::Client,
    circuit_breaker: Arc<CircuitBreaker>,
    base_url: String,
}

impl YahooProfileProvider {
    pub fn new(circuit_breaker: Arc<CircuitBreaker>, timeout: Duration) -> Result<Self, DataError> {
        Ok(Self {
            client: http_client(timeout)?,
            circuit_breaker,
            base_url: YAHOO_SUMMARY_BASE.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn parse_response(symbol: &str, resp: SummaryResponse) -> Result<CompanyProfile, DataError> {
        let modules = resp
            .quote_summary
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| match resp.quote_summary.error {
                Some(err) if err.code == "Not Found" => DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                },
                Some(err) => DataError::Provider(format!("{}: {}", err.code, err.description)),
                None => DataError::EmptyResponse {
                    symbol: symbol.to_string(),
                },
            })?;

        let (sector, industry, country) = modules
            .asset_profile
            .map(|p| (p.sector, p.industry, p.country))
            .unwrap_or_default();
        let (long_name, market_cap) = modules
            .price
            .map(|p| {
                let cap = p
                    .market_cap
                    .and_then(|m| m.raw)
                    .filter(|v| v.is_finite() && *v >= 0.0)
                    .map(|v| v.round() as u64);
                (p.long_name, cap)
            })
            .unwrap_or_default();

        Ok(CompanyProfile {
            long_name: non_blank(long_name),
            sector: non_blank(sector),
            industry: non_blank(industry),
            market_cap,
            country: non_blank(country),
        })
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}

impl ProfileProvider for YahooProfileProvider {
    fn name(&self) -> &str {
        "yahoo_quote_summary"
    }

    fn fetch_profile(&self, symbol: &str) -> Result<CompanyProfile, DataError> {
        if !self.circuit_breaker.is_allowed() {
            return Err(DataError::CircuitBreakerTripped);
        }

        let url = format!("{}/{symbol}?modules=assetProfile,price", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DataError::from_transport(&e))?;

        let status = resp.status();
        if status == reqwest::StatusCode::FORBIDDEN {
            self.circuit_breaker.trip();
            return Err(DataError::CircuitBreakerTripped);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(DataError::AuthenticationRequired(
                "Yahoo quoteSummary requires a session crumb".into(),
            ));
        }
        if !status.is_success() && status != reqwest::StatusCode::NOT_FOUND {
            self.circuit_breaker.record_failure();
            return Err(DataError::Other(format!("HTTP {status} for {symbol} profile")));
        }

        let summary: SummaryResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse profile for {symbol}: {e}"))
        })?;
        self.circuit_breaker.record_success();
        Self::parse_response(symbol, summary)
    }
}
