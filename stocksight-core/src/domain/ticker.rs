use crate::error::ForecastError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Validated ticker symbol: trimmed, upper-cased, non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    pub fn parse(raw: &str) -> Result<Self, ForecastError> {
        let symbol = raw.trim();
        let valid = !symbol.is_empty()
            && symbol
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='));
        if !valid {
            return Err(ForecastError::InvalidTicker(raw.to_string()));
        }
        Ok(Self(symbol.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Ticker {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Ticker {
    type Error = ForecastError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Ticker> for String {
    fn from(t: Ticker) -> Self {
        t.0
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Ticker::parse(" aapl ").unwrap().as_str(), "AAPL");
        assert_eq!(Ticker::parse("brk.b").unwrap().as_str(), "BRK.B");
        assert_eq!(Ticker::parse("^gspc").unwrap().as_str(), "^GSPC");
    }

    #[test]
    fn rejects_empty_and_garbage() {
        assert!(matches!(
            Ticker::parse("   "),
            Err(ForecastError::InvalidTicker(_))
        ));
        assert!(Ticker::parse("AA PL").is_err());
        assert!(Ticker::parse("AAPL/../../etc").is_err());
    }

    #[test]
    fn serde_roundtrip_validates() {
        let t: Ticker = serde_json::from_str("\"msft\"").unwrap();
        assert_eq!(t.as_str(), "MSFT");
        assert!(serde_json::from_str::<Ticker>("\"\"").is_err());
    }
}
