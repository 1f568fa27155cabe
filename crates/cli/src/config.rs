//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `LEON_DATA_DIR` - Directory holding the persisted cart (default: `.leon`)
//! - `LEON_PRICE_POLICY` - `lenient` (default) or `strict`
//! - `LEON_LOG_FORMAT` - `pretty` (default) or `json`
//! - `SENTRY_DSN` - Sentry error tracking DSN
//!
//! Catalog variables are documented on [`CatalogConfig`].

use std::path::PathBuf;

use leon_cart::PricePolicy;
use leon_catalog::{CatalogConfig, ConfigError};

const DEFAULT_DATA_DIR: &str = ".leon";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Directory for the file-backed cart store.
    pub data_dir: PathBuf,
    /// How unparseable prices are handled.
    pub price_policy: PricePolicy,
    /// Log output format.
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking.
    pub sentry_dsn: Option<String>,
    /// Catalog backend configuration.
    pub catalog: CatalogConfig,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`CliConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir =
            get("LEON_DATA_DIR").map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);

        let price_policy = get("LEON_PRICE_POLICY")
            .map(|v| {
                v.trim()
                    .parse::<PricePolicy>()
                    .map_err(|e| {
                        ConfigError::InvalidEnvVar("LEON_PRICE_POLICY".to_string(), e.to_string())
                    })
            })
            .transpose()?
            .unwrap_or_default();

        let log_format = match get("LEON_LOG_FORMAT").map(|v| v.trim().to_ascii_lowercase()) {
            None => LogFormat::Pretty,
            Some(v) if v == "pretty" || v == "text" => LogFormat::Pretty,
            Some(v) if v == "json" => LogFormat::Json,
            Some(v) => {
                return Err(ConfigError::InvalidEnvVar(
                    "LEON_LOG_FORMAT".to_string(),
                    format!("expected pretty or json, got '{v}'"),
                ));
            }
        };

        Ok(Self {
            data_dir,
            price_policy,
            log_format,
            sentry_dsn: get("SENTRY_DSN"),
            catalog: CatalogConfig::from_lookup(&lookup)?,
        })
    }
}
