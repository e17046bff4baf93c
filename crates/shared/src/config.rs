//! Application configuration management.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::types::{CompanyId, Currency};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Remote data store configuration.
    pub store: StoreConfig,
    /// Report window configuration.
    pub report: ReportConfig,
}

/// Remote data store (hosted database RPC endpoint) configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the hosted database, e.g. `https://xyz.supabase.co`.
    pub url: String,
    /// Anonymous/service API key sent as `apikey` and bearer token.
    pub api_key: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Which company and which window to report on.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Selected company.
    pub company_id: CompanyId,
    /// First day of the reporting window.
    pub opening: NaiveDate,
    /// Last day of the reporting window (closing date).
    pub closing: NaiveDate,
    /// Directory the JSON bundle and CSV worksheets are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Presentation currency.
    #[serde(default)]
    pub currency: Currency,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("reports")
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("BALANZA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
