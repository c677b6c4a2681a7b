//! NewsAPI.org `everything` endpoint.
//!
//! The API key is injected at construction (config file or environment) and
//! sent as the `X-Api-Key` header, never in the URL.

use super::provider::NewsProvider;
use crate::data::yahoo::http_client;
use crate::data::{CircuitBreaker, DataError};
use crate::domain::Headline;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const NEWSAPI_EVERYTHING: &str = "https://newsapi.org/v2/everything";

/// Environment variable consulted when no key is configured.
pub const NEWS_API_KEY_ENV: &str = "STOCKSIGHT_NEWS_API_KEY";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EverythingResponse {
    status: String,
    code: Option<String>,
    message: Option<String>,
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Article {
    title: Option<String>,
    published_at: Option<String>,
}

/// `Retry-After` in seconds; NewsAPI's developer plan resets hourly.
fn retry_after_secs(headers: &reqwest::header::HeaderMap) -> u64 {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(3600)
}

pub struct NewsApiProvider {
    client: reqwest::blocking::Client,
    api_key: SecretString,
    circuit_breaker: Arc<CircuitBreaker>,
    base_url: String,
    language: String,
    page_size: usize,
}

impl NewsApiProvider {
    pub fn new(
        api_key: SecretString,
        circuit_breaker: Arc<CircuitBreaker>,
        timeout: Duration,
    ) -> Result<Self, DataError> {
        if api_key.expose_secret().trim().is_empty() {
            return Err(DataError::AuthenticationRequired(
                "news API key is empty".into(),
            ));
        }
        Ok(Self {
            client: http_client(timeout)?,
            api_key,
            circuit_breaker,
            base_url: NEWSAPI_EVERYTHING.to_string(),
            language: "en".to_string(),
            page_size: 20,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// NewsAPI caps `pageSize` at 100.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.clamp(1, 100);
        self
    }

    fn parse_response(resp: EverythingResponse) -> Result<Vec<Headline>, DataError> {
        if resp.status != "ok" {
            let code = resp.code.unwrap_or_else(|| "unknown".into());
            let message = resp.message.unwrap_or_default();
            return Err(match code.as_str() {
                "apiKeyMissing" | "apiKeyInvalid" | "apiKeyDisabled" | "apiKeyExhausted" => {
                    DataError::AuthenticationRequired(format!("{code}: {message}"))
                }
                "rateLimited" => DataError::RateLimited {
                    retry_after_secs: 3600,
                },
                _ => DataError::Provider(format!("{code}: {message}")),
            });
        }

        Ok(resp
            .articles
            .into_iter()
            .filter_map(|a| {
                let title = a.title.filter(|t| !t.trim().is_empty())?;
                let published_at = a
                    .published_at
                    .and_then(|p| DateTime::parse_from_rfc3339(&p).ok())
                    .map(|dt| dt.with_timezone(&Utc));
                Some(Headline {
                    title: title.trim().to_string(),
                    published_at,
                })
            })
            .collect())
    }
}

impl NewsProvider for NewsApiProvider {
    fn name(&self) -> &str {
        "newsapi"
    }

    fn fetch(&self, symbol: &str) -> Result<Vec<Headline>, DataError> {
        if !self.circuit_breaker.is_allowed() {
            return Err(DataError::CircuitBreakerTripped);
        }

        let page_size = self.page_size.to_string();
        let resp = self
            .client
            .get(&self.base_url)
            .header("X-Api-Key", self.api_key.expose_secret())
            .query(&[
                ("q", symbol),
                ("language", self.language.as_str()),
                ("sortBy", "publishedAt"),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .map_err(|e| DataError::from_transport(&e))?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            self.circuit_breaker.record_failure();
            return Err(DataError::RateLimited {
                retry_after_secs: retry_after_secs(resp.headers()),
            });
        } else if status.is_server_error() {
            self.circuit_breaker.record_failure();
            return Err(DataError::Other(format!("HTTP {status} from news provider")));
        }

        // Client errors carry a JSON body with status/code/message.
        let body: EverythingResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse news response: {e}"))
        })?;
        let headlines = Self::parse_response(body)?;
        self.circuit_breaker.record_success();
        debug!(symbol, count = headlines.len(), "news articles parsed");
        Ok(headlines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Vec<Headline>, DataError> {
        let resp: EverythingResponse = serde_json::from_str(json).unwrap();
        NewsApiProvider::parse_response(resp)
    }

    #[test]
    fn parses_articles_and_skips_untitled() {
        let json = r#"{"status":"ok","totalResults":3,"articles":[
            {"source":{"id":null,"name":"Wire"},"title":"Company beats expectations","publishedAt":"2024-05-01T12:00:00Z","url":"x"},
            {"title":null,"publishedAt":"2024-05-01T11:00:00Z"},
            {"title":"Undated story","publishedAt":"yesterday"}
        ]}"#;
        let headlines = parse(json).unwrap();
        assert_eq!(headlines.len(), 2);
        assert_eq!(headlines[0].title, "Company beats expectations");
        assert!(headlines[0].published_at.is_some());
        assert!(headlines[1].published_at.is_none());
    }

    #[test]
    fn invalid_key_is_authentication_error() {
        let json = r#"{"status":"error","code":"apiKeyInvalid","message":"Your API key is invalid"}"#;
        assert!(matches!(
            parse(json),
            Err(DataError::AuthenticationRequired(_))
        ));
    }

    #[test]
    fn no_articles_is_empty_not_error() {
        let json = r#"{"status":"ok","totalResults":0,"articles":[]}"#;
        assert!(parse(json).unwrap().is_empty());
    }

    #[test]
    fn empty_key_rejected() {
        let res = NewsApiProvider::new(
            SecretString::from(""),
            Arc::new(CircuitBreaker::default_provider()),
            Duration::from_secs(5),
        );
        assert!(matches!(res, Err(DataError::AuthenticationRequired(_))));
    }

    /// Serve one canned HTTP response on a loopback port.
    fn serve_once(response: &'static str) -> String {
        use std::io::{Read, Write};
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let _ = stream.write_all(response.as_bytes());
        });
        format!("http://{addr}/v2/everything")
    }

    #[test]
    fn too_many_requests_with_plain_body_is_rate_limited() {
        let url = serve_once(
            "HTTP/1.1 429 Too Many Requests\r\nRetry-After: 7\r\nContent-Type: text/plain\r\nContent-Length: 9\r\nConnection: close\r\n\r\nslow down",
        );
        let provider = NewsApiProvider::new(
            SecretString::from("test-key"),
            Arc::new(CircuitBreaker::default_provider()),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_base_url(url);

        let err = provider.fetch("AAPL").unwrap_err();
        assert!(matches!(err, DataError::RateLimited { retry_after_secs: 7 }));
    }

    #[test]
    fn retry_after_defaults_to_an_hour() {
        let headers = reqwest::header::HeaderMap::new();
        assert_eq!(retry_after_secs(&headers), 3600);
    }
}
