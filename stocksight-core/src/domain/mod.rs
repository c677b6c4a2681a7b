//! Domain types shared by the price and sentiment pipelines.

pub mod bar;
pub mod news;
pub mod profile;
pub mod ticker;

pub use bar::{PriceBar, PriceSeries};
pub use news::{
    Headline, ScoredHeadline, SentimentBreakdown, SentimentLabel, SentimentSummary,
    POLARITY_THRESHOLD,
};
pub use profile::CompanyProfile;
pub use ticker::Ticker;
