//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod database;
pub mod logging;
pub mod printer;
pub mod reconciler;

use serde::{Deserialize, Serialize};

pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::printer::PrinterConfig;
pub use self::reconciler::ReconcilerConfig;

use crate::error::AppError;

/// Largest accepted `reconciler.guard_seconds` (one day).
pub const MAX_GUARD_SECONDS: u64 = 86_400;

/// Largest accepted `reconciler.interval_seconds` (one year).
pub const MAX_INTERVAL_SECONDS: u64 = 365 * 86_400;

/// Largest accepted lookback, in days (about a thousand years).
pub const MAX_LOOKBACK_DAYS: u32 = 365_000;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (base file + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite queue store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Background retry reconciler settings.
    #[serde(default)]
    pub reconciler: ReconcilerConfig,
    /// Network printer settings.
    #[serde(default)]
    pub printer: PrinterConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the base file at `path` with an optional `config/{env}`
    /// overlay and environment variables prefixed with `PRINTSRV__`.
    pub fn load(path: &str, env: Option<&str>) -> Result<Self, AppError> {
        let mut builder =
            config::Config::builder().add_source(config::File::with_name(path).required(false));

        if let Some(env) = env {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{env}")).required(false));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("PRINTSRV")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.database.path.trim().is_empty() {
            return Err(AppError::configuration("database.path must not be empty"));
        }
        if self.printer.hostname.trim().is_empty() {
            return Err(AppError::configuration("printer.hostname must not be empty"));
        }
        if self.reconciler.interval_seconds == 0 {
            return Err(AppError::configuration(
                "reconciler.interval_seconds must be greater than zero",
            ));
        }
        if self.reconciler.interval_seconds > MAX_INTERVAL_SECONDS {
            return Err(AppError::configuration(format!(
                "reconciler.interval_seconds must be at most {MAX_INTERVAL_SECONDS}"
            )));
        }
        if self.reconciler.lookback_days == 0 {
            return Err(AppError::configuration(
                "reconciler.lookback_days must be greater than zero",
            ));
        }
        if self.reconciler.lookback_days > MAX_LOOKBACK_DAYS {
            return Err(AppError::configuration(format!(
                "reconciler.lookback_days must be at most {MAX_LOOKBACK_DAYS}"
            )));
        }
        if self.reconciler.first_run_lookback_days == 0
            || self.reconciler.first_run_lookback_days > MAX_LOOKBACK_DAYS
        {
            return Err(AppError::configuration(format!(
                "reconciler.first_run_lookback_days must be between 1 and {MAX_LOOKBACK_DAYS}"
            )));
        }
        if self.reconciler.guard_seconds > MAX_GUARD_SECONDS {
            return Err(AppError::configuration(format!(
                "reconciler.guard_seconds must be at most {MAX_GUARD_SECONDS}"
            )));
        }
        if self.reconciler.job_id.trim().is_empty() {
            return Err(AppError::configuration("reconciler.job_id must not be empty"));
        }
        Ok(())
    }
}
