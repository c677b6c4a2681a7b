//! CSV price import.
//!
//! Accepts the usual market-data export layout: a header row containing
//! `Date, Open, High, Low, Close, Volume` (any case, extra columns ignored).
//! Empty cells are carried as missing fields; the date column may hold a
//! plain date or a timestamp whose first ten characters are the date.

use super::provider::{DataError, DataSource, FetchResult, PriceProvider};
use crate::domain::PriceBar;
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Date", alias = "DATE", alias = "timestamp", alias = "Datetime")]
    date: String,
    #[serde(alias = "Open", alias = "OPEN", default)]
    open: Option<f64>,
    #[serde(alias = "High", alias = "HIGH", default)]
    high: Option<f64>,
    #[serde(alias = "Low", alias = "LOW", default)]
    low: Option<f64>,
    #[serde(alias = "Close", alias = "CLOSE", default)]
    close: Option<f64>,
    #[serde(alias = "Volume", alias = "VOLUME", default)]
    volume: Option<f64>,
}

fn parse_date(raw: &str) -> Result<NaiveDate, DataError> {
    let trimmed = raw.trim();
    let head = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .map_err(|e| DataError::CsvError(format!("bad date {raw:?}: {e}")))
}

/// Parse OHLCV rows from any reader.
pub fn read_bars<R: Read>(reader: R) -> Result<Vec<PriceBar>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut bars = Vec::new();
    for (line, record) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = record.map_err(|e| DataError::CsvError(format!("row {}: {e}", line + 2)))?;
        bars.push(PriceBar {
            date: parse_date(&row.date)?,
            open: row.open.unwrap_or(f64::NAN),
            high: row.high.unwrap_or(f64::NAN),
            low: row.low.unwrap_or(f64::NAN),
            close: row.close.unwrap_or(f64::NAN),
            volume: row.volume.unwrap_or(f64::NAN),
        });
    }
    Ok(bars)
}

/// Reads `{dir}/{SYMBOL}.csv`.
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }
}

impl PriceProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv_import"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        let file = std::fs::File::open(&path)
            .map_err(|e| DataError::CsvError(format!("open {}: {e}", path.display())))?;

        let bars: Vec<PriceBar> = read_bars(file)?
            .into_iter()
            .filter(|b| b.date >= start && b.date <= end)
            .collect();

        if bars.is_empty() {
            return Err(DataError::EmptyResponse {
                symbol: symbol.to_string(),
            });
        }

        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::CsvImport,
            warnings: Vec::new(),
        })
    }
}
