//! Artifact export: JSON dashboard and CSV prediction table.
//!
//! Persisted dashboards carry a `schema_version`; newer versions are
//! rejected on load.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use stocksight_core::results::PredictionSet;

use crate::dashboard::{Dashboard, SCHEMA_VERSION};

// ─── JSON ───────────────────────────────────────────────────────────

pub fn export_json(dashboard: &Dashboard) -> Result<String> {
    serde_json::to_string_pretty(dashboard).context("failed to serialize dashboard to JSON")
}

pub fn import_json(json: &str) -> Result<Dashboard> {
    let dashboard: Dashboard =
        serde_json::from_str(json).context("failed to deserialize dashboard from JSON")?;
    if dashboard.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            dashboard.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(dashboard)
}

// ─── CSV ────────────────────────────────────────────────────────────

/// Columns: date, actual, predicted, difference
pub fn export_predictions_csv(predictions: &PredictionSet) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "actual", "predicted", "difference"])?;
    for row in predictions {
        wtr.write_record([
            row.date.to_string(),
            format!("{:.4}", row.actual),
            format!("{:.4}", row.predicted),
            format!("{:.2}", row.difference),
        ])?;
    }
    let bytes = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}

// ─── Files ──────────────────────────────────────────────────────────

/// `{output_dir}/{TICKER}_{YYYYmmdd_HHMMSS}`
pub fn artifact_dir(output_dir: &Path, dashboard: &Dashboard) -> PathBuf {
    output_dir.join(format!(
        "{}_{}",
        dashboard.ticker,
        dashboard.generated_at.format("%Y%m%d_%H%M%S")
    ))
}

/// Write `dashboard.json` and `predictions.csv`. Returns the directory.
pub fn write_artifacts(output_dir: &Path, dashboard: &Dashboard) -> Result<PathBuf> {
    let dir = artifact_dir(output_dir, dashboard);
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create artifact dir {}", dir.display()))?;

    let json_path = dir.join("dashboard.json");
    fs::write(&json_path, export_json(dashboard)?)
        .with_context(|| format!("failed to write {}", json_path.display()))?;

    let csv_path = dir.join("predictions.csv");
    fs::write(&csv_path, export_predictions_csv(&dashboard.forecast.predictions)?)
        .with_context(|| format!("failed to write {}", csv_path.display()))?;

    Ok(dir)
}
