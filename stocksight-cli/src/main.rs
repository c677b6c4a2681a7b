//! StockSight CLI: analyze, download, and cache commands.
//!
//! Commands:
//! - `analyze`: price forecast, headline sentiment, and company profile for one ticker
//! - `download`: fetch price history from Yahoo Finance and cache as Parquet
//! - `cache status`: report cached tickers, date ranges, and sizes

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use stocksight_core::data::{CircuitBreaker, PriceCache, PriceProvider, YahooProvider};
use stocksight_core::domain::{CompanyProfile, Ticker};
use stocksight_runner::{
    export_json, run_dashboard, write_artifacts, Collaborators, Dashboard, DashboardConfig,
    DataLoader, LoadOptions, ProviderSet, SentimentSection,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "stocksight",
    about = "StockSight: close-price regression and news sentiment for a stock ticker"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the dashboard for one ticker.
    Analyze {
        /// Ticker symbol (case-insensitive, e.g. aapl).
        ticker: String,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// History start date (YYYY-MM-DD). Defaults to 2015-01-01.
        #[arg(long)]
        start: Option<String>,

        /// Share of rows used for training, in (0, 1). Defaults to 0.8.
        #[arg(long)]
        train_fraction: Option<f64>,

        /// Maximum number of headlines to score. Defaults to 10.
        #[arg(long)]
        headlines: Option<usize>,

        /// Offline mode: no network access.
        #[arg(long, default_value_t = false)]
        offline: bool,

        /// Use synthetic prices when real data is unavailable.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Run the price and sentiment pipelines one after the other.
        #[arg(long, default_value_t = false)]
        sequential: bool,

        /// Cache directory.
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// Output directory for artifacts.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Print the dashboard as JSON instead of the text summary.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Download price history from Yahoo Finance and cache as Parquet.
    Download {
        /// Tickers to download (e.g., SPY AAPL).
        #[arg(required = true)]
        tickers: Vec<String>,

        /// Start date (YYYY-MM-DD). Defaults to 2015-01-01.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Force re-download even if cached.
        #[arg(long, default_value_t = false)]
        force: bool,

        /// Cache directory.
        #[arg(long, default_value = "data/cache")]
        cache_dir: PathBuf,
    },
    /// Cache management commands.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Report cached tickers, date ranges, bar counts, and sizes.
    Status {
        /// Cache directory.
        #[arg(long, default_value = "data/cache")]
        cache_dir: PathBuf,
    },
}

struct AnalyzeArgs {
    ticker: String,
    config: Option<PathBuf>,
    start: Option<String>,
    train_fraction: Option<f64>,
    headlines: Option<usize>,
    offline: bool,
    synthetic: bool,
    sequential: bool,
    cache_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            ticker,
            config,
            start,
            train_fraction,
            headlines,
            offline,
            synthetic,
            sequential,
            cache_dir,
            output_dir,
            json,
        } => run_analyze(AnalyzeArgs {
            ticker,
            config,
            start,
            train_fraction,
            headlines,
            offline,
            synthetic,
            sequential,
            cache_dir,
            output_dir,
            json,
        }),
        Commands::Download {
            tickers,
            start,
            end,
            force,
            cache_dir,
        } => run_download(tickers, start, end, force, cache_dir),
        Commands::Cache { action } => match action {
            CacheAction::Status { cache_dir } => run_cache_status(&cache_dir),
        },
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{raw}', expected YYYY-MM-DD"))
}

/// CLI flags override the config file and environment.
fn apply_flags(config: &mut DashboardConfig, args: &AnalyzeArgs) -> Result<()> {
    if let Some(start) = args.start.as_deref() {
        config.price.start_date = parse_date(start)?;
    }
    if let Some(fraction) = args.train_fraction {
        config.model.train_fraction = fraction;
    }
    if let Some(limit) = args.headlines {
        config.news.headline_limit = limit;
    }
    if args.offline {
        config.price.offline = true;
    }
    if args.synthetic {
        config.price.synthetic = true;
    }
    if args.sequential {
        config.run.parallel = false;
    }
    if let Some(dir) = &args.cache_dir {
        config.price.cache_dir = dir.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.run.output_dir = dir.clone();
    }
    Ok(())
}

fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let ticker = Ticker::parse(&args.ticker)?;

    let mut config = DashboardConfig::load(args.config.as_deref())?;
    apply_flags(&mut config, &args)?;
    config.validate()?;

    let providers =
        ProviderSet::from_config(&config).context("failed to configure data providers")?;
    let dashboard = run_dashboard(&ticker, Collaborators::from(&providers), &config)
        .with_context(|| format!("analysis failed for {ticker}"))?;

    let run_dir = write_artifacts(&config.run.output_dir, &dashboard)?;
    info!(dir = %run_dir.display(), "artifacts saved");

    if args.json {
        println!("{}", export_json(&dashboard)?);
    } else {
        print_summary(&dashboard);
        println!();
        println!("Artifacts saved to: {}", run_dir.display());
    }
    Ok(())
}

fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or("N/A")
}

fn format_market_cap(cap: Option<u64>) -> String {
    let Some(cap) = cap else {
        return "N/A".to_string();
    };
    let cap = cap as f64;
    if cap >= 1e12 {
        format!("${:.2}T", cap / 1e12)
    } else if cap >= 1e9 {
        format!("${:.2}B", cap / 1e9)
    } else if cap >= 1e6 {
        format!("${:.2}M", cap / 1e6)
    } else {
        format!("${cap:.0}")
    }
}

fn print_profile(profile: Option<&CompanyProfile>) {
    let empty = CompanyProfile::default();
    let p = profile.unwrap_or(&empty);
    println!("  Name:       {}", or_na(p.long_name.as_deref()));
    println!("  Sector:     {}", or_na(p.sector.as_deref()));
    println!("  Industry:   {}", or_na(p.industry.as_deref()));
    println!("  Market cap: {}", format_market_cap(p.market_cap));
    println!("  Country:    {}", or_na(p.country.as_deref()));
}

fn print_summary(d: &Dashboard) {
    println!("=== {} ===", d.ticker);
    if d.is_synthetic() {
        println!("*** SYNTHETIC DATA: not real market prices ***");
    }
    println!();

    println!("Company");
    print_profile(d.profile.as_ref());
    println!();

    println!("Price model");
    println!(
        "  History:    {} rows from {} ({} to {})",
        d.history.rows,
        d.history.source,
        d.history.start.map_or("N/A".to_string(), |s| s.to_string()),
        d.history.end.map_or("N/A".to_string(), |s| s.to_string()),
    );
    let model = &d.forecast.model;
    println!("  Split:      {} train / {} test", model.train_rows, model.test_rows);
    println!("  MSE:        {:.4}", model.mean_squared_error);
    println!("  R² (train): {:.4}", model.r_squared);
    if let Some(latest) = d.forecast.predictions.latest() {
        println!("  Latest:     {}", latest.date);
        println!("    Actual:     {:.2}", latest.actual);
        println!("    Predicted:  {:.2}", latest.predicted);
        println!("    Difference: {:+.2}", latest.difference);
    }
    println!();

    println!("News sentiment");
    match &d.sentiment {
        SentimentSection::Available(report) => {
            let s = &report.summary;
            println!("  Overall:    {} ({:+.3})", s.label, s.average_polarity);
            let b = &report.breakdown;
            println!(
                "  Breakdown:  {} positive / {} neutral / {} negative",
                b.positive, b.neutral, b.negative
            );
            for h in &report.headlines {
                println!("  {:>+6.2}  {}", h.polarity, h.title);
            }
        }
        SentimentSection::Unavailable { reason } => {
            println!("  Unavailable: {reason}");
        }
    }

    if !d.warnings.is_empty() {
        println!();
        println!("Warnings");
        for w in &d.warnings {
            println!("  - {w}");
        }
    }
}

fn run_download(
    tickers: Vec<String>,
    start: Option<String>,
    end: Option<String>,
    force: bool,
    cache_dir: PathBuf,
) -> Result<()> {
    let start_date = start
        .as_deref()
        .map(parse_date)
        .transpose()?
        .unwrap_or_else(stocksight_core::data::default_start_date);
    let end_date = end
        .as_deref()
        .map(parse_date)
        .transpose()?
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    if end_date < start_date {
        bail!("end date {end_date} precedes start date {start_date}");
    }

    let circuit_breaker = Arc::new(CircuitBreaker::default_provider());
    let provider = YahooProvider::new(circuit_breaker, Duration::from_secs(30))?;
    let loader = DataLoader::new(
        PriceCache::new(cache_dir),
        Some(Box::new(provider)),
        LoadOptions {
            force,
            ..LoadOptions::default()
        },
    );

    let mut failures = 0usize;
    for raw in &tickers {
        let ticker = match Ticker::parse(raw) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Error for {raw}: {e}");
                failures += 1;
                continue;
            }
        };
        match loader.fetch(ticker.as_str(), start_date, end_date) {
            Ok(fetched) => println!(
                "{ticker}: {} bars ({})",
                fetched.bars.len(),
                fetched.source
            ),
            Err(e) => {
                eprintln!("Error for {ticker}: {e}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} downloads failed", tickers.len());
    }
    Ok(())
}

fn run_cache_status(cache_dir: &Path) -> Result<()> {
    if !cache_dir.exists() {
        println!("Cache directory does not exist: {}", cache_dir.display());
        return Ok(());
    }

    let cache = PriceCache::new(cache_dir);
    let symbols = cache.cached_symbols();
    if symbols.is_empty() {
        println!("Cache is empty: {}", cache_dir.display());
        return Ok(());
    }

    let refs: Vec<&str> = symbols.iter().map(String::as_str).collect();
    let statuses = cache.status(&refs);
    let total_size: u64 = refs.iter().map(|s| cache.symbol_size(s)).sum();

    println!("Cache: {}", cache_dir.display());
    println!("Symbols: {}", symbols.len());
    println!("Total size: {}", format_size(total_size));
    println!();
    println!("{:<8} {:<25} {:<12} {:>10}", "Symbol", "Date Range", "Bars", "Size");
    println!("{}", "-".repeat(58));
    for status in &statuses {
        let range = match (status.start_date, status.end_date) {
            (Some(s), Some(e)) => format!("{s} to {e}"),
            _ => "(no meta)".to_string(),
        };
        let bars = status
            .bar_count
            .map_or("N/A".to_string(), |n| format!("{n} bars"));
        println!(
            "{:<8} {:<25} {:<12} {:>10}",
            status.symbol,
            range,
            bars,
            format_size(cache.symbol_size(&status.symbol))
        );
    }

    Ok(())
}

fn format_size(bytes: u64) -> String {
    if bytes >= 1_073_741_824 {
        format!("{:.1} GB", bytes as f64 / 1_073_741_824.0)
    } else if bytes >= 1_048_576 {
        format!("{:.1} MB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_analyze_flags() {
        let cli = Cli::try_parse_from([
            "stocksight",
            "analyze",
            "aapl",
            "--train-fraction",
            "0.75",
            "--headlines",
            "5",
            "--offline",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze {
                ticker,
                train_fraction,
                headlines,
                offline,
                json,
                ..
            } => {
                assert_eq!(ticker, "aapl");
                assert_eq!(train_fraction, Some(0.75));
                assert_eq!(headlines, Some(5));
                assert!(offline);
                assert!(json);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn flags_override_config() {
        let mut config = DashboardConfig::default();
        let args = AnalyzeArgs {
            ticker: "spy".into(),
            config: None,
            start: Some("2020-01-01".into()),
            train_fraction: Some(0.6),
            headlines: Some(3),
            offline: true,
            synthetic: false,
            sequential: true,
            cache_dir: None,
            output_dir: Some(PathBuf::from("out")),
            json: false,
        };
        apply_flags(&mut config, &args).unwrap();
        assert_eq!(config.price.start_date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(config.model.train_fraction, 0.6);
        assert_eq!(config.news.headline_limit, 3);
        assert!(config.price.offline);
        assert!(!config.run.parallel);
        assert_eq!(config.run.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn bad_start_date_is_rejected() {
        assert!(parse_date("01/02/2020").is_err());
    }

    #[test]
    fn missing_profile_fields_render_na() {
        assert_eq!(or_na(None), "N/A");
        assert_eq!(format_market_cap(None), "N/A");
        assert_eq!(format_market_cap(Some(2_500_000_000_000)), "$2.50T");
    }

    #[test]
    fn size_formatting() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
    }
}
