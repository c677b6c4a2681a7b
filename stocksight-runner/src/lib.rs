//! StockSight Runner: configuration, data loading policy, dashboard orchestration, artifacts.
//!
//! This crate builds on `stocksight-core` to provide:
//! - TOML configuration with environment overrides
//! - Price loading with cache/download/synthetic fallback
//! - Provider wiring from configuration
//! - The one-ticker dashboard (price forecast + sentiment + profile)
//! - JSON and CSV artifact export

pub mod config;
pub mod dashboard;
pub mod data_loader;
pub mod export;
pub mod providers;

pub use config::{ConfigError, DashboardConfig};
pub use dashboard::{run_dashboard, Collaborators, Dashboard, SentimentSection, SCHEMA_VERSION};
pub use data_loader::{DataLoader, LoadError, LoadOptions};
pub use export::{export_json, export_predictions_csv, import_json, write_artifacts};
pub use providers::ProviderSet;

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn dashboard_is_send_sync() {
        assert_send::<Dashboard>();
        assert_sync::<Dashboard>();
    }

    #[test]
    fn config_is_send_sync() {
        assert_send::<DashboardConfig>();
        assert_sync::<DashboardConfig>();
    }

    #[test]
    fn provider_set_is_send_sync() {
        assert_send::<ProviderSet>();
        assert_sync::<ProviderSet>();
        assert_send::<DataLoader>();
        assert_sync::<DataLoader>();
    }
}
