//! Parquet price cache with Hive-style partitioning.
//!
//! Layout: `{cache_dir}/symbol={TICKER}/{year}.parquet` plus a `meta.json`
//! sidecar per ticker (blake3 data hash, date range, source).
//!
//! Writes are atomic: a whole entry is staged in a hidden sibling directory
//! and renamed into place. Files that fail validation on load, or whose
//! content no longer matches the sidecar hash, are renamed to
//! `{file}.quarantined`.

use super::provider::{DataError, DataSource};
use crate::domain::PriceBar;
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Days from 0001-01-01 (CE day 1) to 1970-01-01.
const UNIX_EPOCH_CE_DAYS: i32 = 719_163;

const COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMeta {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Window asked of the upstream provider; absent in older sidecars.
    #[serde(default)]
    pub requested_start: Option<NaiveDate>,
    #[serde(default)]
    pub requested_end: Option<NaiveDate>,
    pub bar_count: usize,
    pub data_hash: String,
    pub source: DataSource,
    pub cached_at: chrono::NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStatus {
    pub symbol: String,
    pub cached: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub bar_count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CoverageResult {
    NotCached,
    FullyCovered,
    PartiallyCovered {
        cached_start: NaiveDate,
        cached_end: NaiveDate,
    },
}

pub struct PriceCache {
    cache_dir: PathBuf,
}

impl PriceCache {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn symbol_dir(&self, symbol: &str) -> PathBuf {
        self.cache_dir.join(format!("symbol={symbol}"))
    }

    fn meta_path(&self, symbol: &str) -> PathBuf {
        self.symbol_dir(symbol).join("meta.json")
    }

    /// Hidden sibling, so `cached_symbols` never lists it.
    fn staging_dir(&self, symbol: &str) -> PathBuf {
        self.cache_dir.join(format!(".symbol={symbol}.staging"))
    }

    /// Replace the cached bars for a symbol.
    pub fn write(&self, symbol: &str, bars: &[PriceBar], source: DataSource) -> Result<(), DataError> {
        let first = bars.iter().map(|b| b.date).min();
        let last = bars.iter().map(|b| b.date).max();
        match (first, last) {
            (Some(first), Some(last)) => self.write_window(symbol, bars, source, first, last),
            _ => Err(DataError::CacheError("no bars to cache".into())),
        }
    }

    /// Replace the cached bars for a symbol, recording the window that was
    /// requested upstream. A listing that began after `requested_start` still
    /// counts as covering it.
    ///
    /// The new partitions and `meta.json` are built in a staging directory and
    /// swapped in by rename, so a failed write leaves the previous entry intact.
    pub fn write_window(
        &self,
        symbol: &str,
        bars: &[PriceBar],
        source: DataSource,
        requested_start: NaiveDate,
        requested_end: NaiveDate,
    ) -> Result<(), DataError> {
        // Load returns date order; hash the same order.
        let mut sorted = bars.to_vec();
        sorted.sort_by_key(|b| b.date);
        let bars = sorted.as_slice();
        let (first, last) = match (bars.first(), bars.last()) {
            (Some(f), Some(l)) => (f.date, l.date),
            _ => return Err(DataError::CacheError("no bars to cache".into())),
        };

        let staging = self.staging_dir(symbol);
        if staging.exists() {
            fs::remove_dir_all(&staging)
                .map_err(|e| DataError::CacheError(format!("failed to clear staging dir: {e}")))?;
        }
        fs::create_dir_all(&staging)
            .map_err(|e| DataError::CacheError(format!("failed to create staging dir: {e}")))?;

        let meta = CacheMeta {
            symbol: symbol.to_string(),
            start_date: first,
            end_date: last,
            requested_start: Some(requested_start.min(first)),
            requested_end: Some(requested_end.max(last)),
            bar_count: bars.len(),
            data_hash: hash_bars(bars),
            source,
            cached_at: chrono::Local::now().naive_local(),
        };
        let partitions = match write_entry(&staging, bars, &meta) {
            Ok(n) => n,
            Err(e) => {
                let _ = fs::remove_dir_all(&staging);
                return Err(e);
            }
        };

        self.swap_in(symbol, &staging)?;
        debug!(symbol, rows = bars.len(), partitions, "cache written");
        Ok(())
    }

    /// Replace `symbol={TICKER}` with the staged directory. The old entry is
    /// moved aside first and restored if the final rename fails.
    fn swap_in(&self, symbol: &str, staging: &Path) -> Result<(), DataError> {
        let sym_dir = self.symbol_dir(symbol);
        let backup = self.cache_dir.join(format!(".symbol={symbol}.old"));
        if backup.exists() {
            fs::remove_dir_all(&backup)
                .map_err(|e| DataError::CacheError(format!("failed to clear backup dir: {e}")))?;
        }

        let had_previous = sym_dir.exists();
        if had_previous {
            if let Err(e) = fs::rename(&sym_dir, &backup) {
                let _ = fs::remove_dir_all(staging);
                return Err(DataError::CacheError(format!("failed to move old entry aside: {e}")));
            }
        }

        if let Err(e) = fs::rename(staging, &sym_dir) {
            if had_previous {
                let _ = fs::rename(&backup, &sym_dir);
            }
            let _ = fs::remove_dir_all(staging);
            return Err(DataError::CacheError(format!("atomic rename failed: {e}")));
        }

        if had_previous {
            if let Err(e) = fs::remove_dir_all(&backup) {
                warn!(symbol, error = %e, "failed to remove replaced cache entry");
            }
        }
        Ok(())
    }

    /// Load all cached bars for a symbol, sorted by date ascending.
    ///
    /// A corrupt partition is quarantined and the rest is returned; its
    /// `meta.json` is quarantined with it since the range no longer holds.
    /// If every partition reads but the content hash disagrees with the
    /// sidecar, the whole entry is quarantined.
    pub fn load(&self, symbol: &str) -> Result<Vec<PriceBar>, DataError> {
        let sym_dir = self.symbol_dir(symbol);
        if !sym_dir.exists() {
            return Err(DataError::NoCachedData {
                symbol: symbol.to_string(),
            });
        }

        let entries =
            fs::read_dir(&sym_dir).map_err(|e| DataError::CacheError(format!("read dir: {e}")))?;

        let mut all_bars = Vec::new();
        let mut partitions = Vec::new();
        let mut quarantined = false;
        for entry in entries {
            let path = entry
                .map_err(|e| DataError::CacheError(format!("dir entry: {e}")))?
                .path();

            if path.extension().and_then(|e| e.to_str()) != Some("parquet") {
                continue;
            }

            match load_and_validate_parquet(&path) {
                Ok(bars) => {
                    all_bars.extend(bars);
                    partitions.push(path);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "quarantining corrupt cache file");
                    quarantine(&path);
                    quarantined = true;
                }
            }
        }
        all_bars.sort_by_key(|b| b.date);

        let meta_path = self.meta_path(symbol);
        if quarantined {
            quarantine(&meta_path);
        } else if let Some(meta) = self.get_meta(symbol) {
            if meta.data_hash != hash_bars(&all_bars) {
                warn!(symbol, "cache content does not match meta.json hash; quarantining entry");
                for path in &partitions {
                    quarantine(path);
                }
                quarantine(&meta_path);
                return Err(DataError::CacheError(format!(
                    "data hash mismatch for '{symbol}'"
                )));
            }
        }

        if all_bars.is_empty() {
            return Err(DataError::NoCachedData {
                symbol: symbol.to_string(),
            });
        }
        Ok(all_bars)
    }

    pub fn get_meta(&self, symbol: &str) -> Option<CacheMeta> {
        let content = fs::read_to_string(self.meta_path(symbol)).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Every ticker with a `symbol=` directory, sorted.
    pub fn cached_symbols(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.cache_dir) else {
            return Vec::new();
        };
        let mut symbols: Vec<String> = entries
            .flatten()
            .filter_map(|e| {
                e.file_name()
                    .to_str()
                    .and_then(|n| n.strip_prefix("symbol="))
                    .map(str::to_string)
            })
            .collect();
        symbols.sort();
        symbols
    }

    pub fn status(&self, symbols: &[&str]) -> Vec<CacheStatus> {
        symbols
            .iter()
            .map(|sym| {
                let meta = self.get_meta(sym);
                CacheStatus {
                    symbol: sym.to_string(),
                    cached: meta.is_some(),
                    start_date: meta.as_ref().map(|m| m.start_date),
                    end_date: meta.as_ref().map(|m| m.end_date),
                    bar_count: meta.as_ref().map(|m| m.bar_count),
                }
            })
            .collect()
    }

    /// Total on-disk size of a ticker's partition directory, in bytes.
    pub fn symbol_size(&self, symbol: &str) -> u64 {
        fs::read_dir(self.symbol_dir(symbol))
            .map(|entries| {
                entries
                    .flatten()
                    .filter_map(|e| e.metadata().ok())
                    .map(|m| m.len())
                    .sum()
            })
            .unwrap_or(0)
    }

    /// Whether the cached entry answers a request for `[start, end]`.
    pub fn covers_range(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> CoverageResult {
        let Some(meta) = self.get_meta(symbol) else {
            return CoverageResult::NotCached;
        };
        let covered_start = meta.requested_start.unwrap_or(meta.start_date).min(meta.start_date);
        let covered_end = meta.requested_end.unwrap_or(meta.end_date).max(meta.end_date);
        if covered_start <= start && covered_end >= end {
            CoverageResult::FullyCovered
        } else {
            CoverageResult::PartiallyCovered {
                cached_start: meta.start_date,
                cached_end: meta.end_date,
            }
        }
    }
}

/// Deterministic blake3 hash over dates and OHLCV values.
pub fn hash_bars(bars: &[PriceBar]) -> String {
    let mut hasher = blake3::Hasher::new();
    for bar in bars {
        hasher.update(bar.date.to_string().as_bytes());
        for v in [bar.open, bar.high, bar.low, bar.close, bar.volume] {
            // One NaN payload, so a missing field hashes the same after a round trip.
            let v = if v.is_nan() { f64::NAN } else { v };
            hasher.update(&v.to_le_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}

fn quarantine(path: &Path) {
    if path.exists() {
        let mut target = path.as_os_str().to_owned();
        target.push(".quarantined");
        let _ = fs::rename(path, PathBuf::from(target));
    }
}

/// Write year partitions and `meta.json` into `dir`, each via tmp + rename.
/// Returns the partition count.
fn write_entry(dir: &Path, bars: &[PriceBar], meta: &CacheMeta) -> Result<usize, DataError> {
    let mut by_year: BTreeMap<i32, Vec<&PriceBar>> = BTreeMap::new();
    for bar in bars {
        by_year.entry(bar.date.year()).or_default().push(bar);
    }

    for (year, year_bars) in &by_year {
        let mut df = bars_to_dataframe(year_bars)?;
        let path = dir.join(format!("{year}.parquet"));
        let tmp_path = path.with_extension("parquet.tmp");
        write_parquet(&mut df, &tmp_path)?;
        fs::rename(&tmp_path, &path)
            .map_err(|e| DataError::CacheError(format!("atomic rename failed: {e}")))?;
    }

    let meta_json = serde_json::to_string_pretty(meta)
        .map_err(|e| DataError::CacheError(format!("meta serialization: {e}")))?;
    let meta_path = dir.join("meta.json");
    let tmp_path = dir.join("meta.json.tmp");
    fs::write(&tmp_path, meta_json)
        .map_err(|e| DataError::CacheError(format!("meta write: {e}")))?;
    fs::rename(&tmp_path, &meta_path)
        .map_err(|e| DataError::CacheError(format!("meta rename: {e}")))?;

    Ok(by_year.len())
}

// ── Parquet I/O helpers ─────────────────────────────────────────────

fn bars_to_dataframe(bars: &[&PriceBar]) -> Result<DataFrame, DataError> {
    let days: Vec<i32> = bars
        .iter()
        .map(|b| b.date.num_days_from_ce() - UNIX_EPOCH_CE_DAYS)
        .collect();
    let col = |f: fn(&PriceBar) -> f64| bars.iter().map(|b| f(b)).collect::<Vec<f64>>();

    DataFrame::new(vec![
        Column::new("date".into(), days)
            .cast(&DataType::Date)
            .map_err(|e| DataError::ParquetError(format!("date cast: {e}")))?,
        Column::new("open".into(), col(|b| b.open)),
        Column::new("high".into(), col(|b| b.high)),
        Column::new("low".into(), col(|b| b.low)),
        Column::new("close".into(), col(|b| b.close)),
        Column::new("volume".into(), col(|b| b.volume)),
    ])
    .map_err(|e| DataError::ParquetError(format!("dataframe creation: {e}")))
}

fn write_parquet(df: &mut DataFrame, path: &Path) -> Result<(), DataError> {
    let file =
        fs::File::create(path).map_err(|e| DataError::ParquetError(format!("create file: {e}")))?;
    ParquetWriter::new(file)
        .finish(df)
        .map_err(|e| DataError::ParquetError(format!("write parquet: {e}")))?;
    Ok(())
}

fn load_and_validate_parquet(path: &Path) -> Result<Vec<PriceBar>, DataError> {
    let file = fs::File::open(path).map_err(|e| DataError::ParquetError(format!("open: {e}")))?;
    let df = ParquetReader::new(file)
        .finish()
        .map_err(|e| DataError::ParquetError(format!("read: {e}")))?;

    if df.height() == 0 {
        return Err(DataError::CacheError("empty parquet file".into()));
    }
    for name in COLUMNS {
        if df.column(name).is_err() {
            return Err(DataError::CacheError(format!("missing column '{name}'")));
        }
    }

    dataframe_to_bars(&df)
}

fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, DataError> {
    df.column(name)
        .map_err(|e| DataError::ParquetError(format!("column read: {e}")))
}

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<f64>, DataError> {
    let ca = column(df, name)?
        .f64()
        .map_err(|e| DataError::ParquetError(format!("{name} column type: {e}")))?;
    Ok(ca.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

fn dataframe_to_bars(df: &DataFrame) -> Result<Vec<PriceBar>, DataError> {
    let dates = column(df, "date")?
        .date()
        .map_err(|e| DataError::ParquetError(format!("date column type: {e}")))?;
    let open = float_column(df, "open")?;
    let high = float_column(df, "high")?;
    let low = float_column(df, "low")?;
    let close = float_column(df, "close")?;
    let volume = float_column(df, "volume")?;

    (0..df.height())
        .map(|i| {
            let days = dates
                .get(i)
                .ok_or_else(|| DataError::ParquetError(format!("null date at row {i}")))?;
            let date = NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_CE_DAYS)
                .ok_or_else(|| DataError::ParquetError(format!("date out of range at row {i}")))?;
            Ok(PriceBar {
                date,
                open: open[i],
                high: high[i],
                low: low[i],
                close: close[i],
                volume: volume[i],
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_cache_dir() -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
        let dir = env::temp_dir().join(format!("stocksight_cache_{}_{id}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn bar(y: i32, m: u32, d: u32, close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            volume: 1_000.0,
        }
    }

    fn sample_bars() -> Vec<PriceBar> {
        vec![bar(2023, 12, 29, 99.0), bar(2024, 1, 2, 101.0), bar(2024, 1, 3, 102.0)]
    }

    #[test]
    fn write_and_load_across_year_partitions() {
        let dir = temp_cache_dir();
        let cache = PriceCache::new(&dir);

        cache.write("SPY", &sample_bars(), DataSource::YahooFinance).unwrap();
        assert!(dir.join("symbol=SPY/2023.parquet").exists());
        assert!(dir.join("symbol=SPY/2024.parquet").exists());

        let loaded = cache.load("SPY").unwrap();
        assert_eq!(loaded, sample_bars());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn nan_fields_survive_roundtrip() {
        let dir = temp_cache_dir();
        let cache = PriceCache::new(&dir);

        let mut bars = sample_bars();
        bars[1].volume = f64::NAN;
        cache.write("SPY", &bars, DataSource::CsvImport).unwrap();

        let loaded = cache.load("SPY").unwrap();
        assert!(loaded[1].volume.is_nan());
        assert!(!loaded[1].is_complete());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_nonexistent_returns_no_cached_data() {
        let dir = temp_cache_dir();
        let cache = PriceCache::new(&dir);
        assert!(matches!(
            cache.load("NONEXISTENT"),
            Err(DataError::NoCachedData { .. })
        ));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn corrupt_partition_is_quarantined() {
        let dir = temp_cache_dir();
        let cache = PriceCache::new(&dir);
        cache.write("SPY", &sample_bars(), DataSource::YahooFinance).unwrap();
        fs::write(dir.join("symbol=SPY/2023.parquet"), b"not parquet").unwrap();

        let loaded = cache.load("SPY").unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(dir.join("symbol=SPY/2023.parquet.quarantined").exists());
        // The sidecar no longer describes what is on disk.
        assert!(cache.get_meta("SPY").is_none());
        assert_eq!(
            cache.covers_range("SPY", loaded[0].date, loaded[1].date),
            CoverageResult::NotCached
        );

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn meta_status_and_coverage() {
        let dir = temp_cache_dir();
        let cache = PriceCache::new(&dir);
        cache.write("SPY", &sample_bars(), DataSource::YahooFinance).unwrap();

        let meta = cache.get_meta("SPY").unwrap();
        assert_eq!(meta.bar_count, 3);
        assert_eq!(meta.data_hash, hash_bars(&sample_bars()));
        assert_eq!(meta.source, DataSource::YahooFinance);

        let statuses = cache.status(&["SPY", "QQQ"]);
        assert!(statuses[0].cached);
        assert!(!statuses[1].cached);
        assert_eq!(cache.cached_symbols(), vec!["SPY".to_string()]);
        assert!(cache.symbol_size("SPY") > 0);

        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        assert_eq!(
            cache.covers_range("SPY", d(2023, 12, 29), d(2024, 1, 3)),
            CoverageResult::FullyCovered
        );
        assert!(matches!(
            cache.covers_range("SPY", d(2015, 1, 1), d(2024, 1, 3)),
            CoverageResult::PartiallyCovered { .. }
        ));
        assert_eq!(
            cache.covers_range("QQQ", d(2024, 1, 1), d(2024, 1, 2)),
            CoverageResult::NotCached
        );

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn failed_write_keeps_previous_entry() {
        let dir = temp_cache_dir();
        let cache = PriceCache::new(&dir);
        cache.write("SPY", &sample_bars(), DataSource::YahooFinance).unwrap();
        let before = cache.get_meta("SPY").unwrap();

        // A plain file where the staging directory goes makes the write fail.
        fs::write(dir.join(".symbol=SPY.staging"), b"in the way").unwrap();
        let replacement = vec![bar(2024, 6, 3, 150.0)];
        assert!(cache.write("SPY", &replacement, DataSource::YahooFinance).is_err());

        assert_eq!(cache.load("SPY").unwrap(), sample_bars());
        let after = cache.get_meta("SPY").unwrap();
        assert_eq!(after.data_hash, before.data_hash);
        assert_eq!(cache.cached_symbols(), vec!["SPY".to_string()]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn rewrite_drops_stale_partitions_and_leaves_no_staging() {
        let dir = temp_cache_dir();
        let cache = PriceCache::new(&dir);
        cache.write("SPY", &sample_bars(), DataSource::YahooFinance).unwrap();

        let narrower = vec![bar(2024, 1, 2, 101.0), bar(2024, 1, 3, 102.0)];
        cache.write("SPY", &narrower, DataSource::YahooFinance).unwrap();

        assert!(!dir.join("symbol=SPY/2023.parquet").exists());
        assert!(!dir.join(".symbol=SPY.staging").exists());
        assert!(!dir.join(".symbol=SPY.old").exists());
        assert!(!dir.join("symbol=SPY/meta.json.tmp").exists());
        assert_eq!(cache.load("SPY").unwrap(), narrower);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn hash_mismatch_quarantines_entry() {
        let dir = temp_cache_dir();
        let cache = PriceCache::new(&dir);
        cache.write("SPY", &sample_bars(), DataSource::YahooFinance).unwrap();

        let mut meta = cache.get_meta("SPY").unwrap();
        meta.data_hash = hash_bars(&[bar(2024, 1, 2, 999.0)]);
        fs::write(
            dir.join("symbol=SPY/meta.json"),
            serde_json::to_string(&meta).unwrap(),
        )
        .unwrap();

        assert!(matches!(cache.load("SPY"), Err(DataError::CacheError(_))));
        assert!(dir.join("symbol=SPY/2024.parquet.quarantined").exists());
        assert!(dir.join("symbol=SPY/meta.json.quarantined").exists());
        assert!(matches!(cache.load("SPY"), Err(DataError::NoCachedData { .. })));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn requested_window_counts_as_covered() {
        let dir = temp_cache_dir();
        let cache = PriceCache::new(&dir);
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();

        // Asked from New Year's Day; the first trading day is later.
        cache
            .write_window("SPY", &sample_bars(), DataSource::YahooFinance, d(2023, 12, 1), d(2024, 1, 5))
            .unwrap();
        assert_eq!(
            cache.covers_range("SPY", d(2023, 12, 1), d(2024, 1, 5)),
            CoverageResult::FullyCovered
        );
        assert_eq!(
            cache.covers_range("SPY", d(2015, 1, 1), d(2024, 1, 5)),
            CoverageResult::PartiallyCovered {
                cached_start: d(2023, 12, 29),
                cached_end: d(2024, 1, 3),
            }
        );

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn unsorted_write_loads_and_verifies() {
        let dir = temp_cache_dir();
        let cache = PriceCache::new(&dir);
        let mut bars = sample_bars();
        bars.reverse();
        cache.write("SPY", &bars, DataSource::CsvImport).unwrap();

        assert_eq!(cache.load("SPY").unwrap(), sample_bars());
        assert_eq!(cache.get_meta("SPY").unwrap().start_date, bars[2].date);

        let _ = fs::remove_dir_all(&dir);
    }
}
