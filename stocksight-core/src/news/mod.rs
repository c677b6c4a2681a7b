//! Headline retrieval.

pub mod newsapi;
pub mod provider;

pub use newsapi::{NewsApiProvider, NEWS_API_KEY_ENV};
pub use provider::{
    recent_headlines, NewsProvider, NewsSource, StaticNewsProvider, DEFAULT_HEADLINE_LIMIT,
};
