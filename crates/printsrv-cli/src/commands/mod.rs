//! CLI command definitions and dispatch.

pub mod init;
pub mod queue;
pub mod reconcile;
pub mod submit;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use printsrv_core::config::AppConfig;
use printsrv_core::error::AppError;
use printsrv_database::{DatabasePool, JobStore};

/// Printsrv: durable print queue with background retry
#[derive(Debug, Parser)]
#[command(name = "printsrv", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay (`config/{env}.toml`)
    #[arg(short, long)]
    pub env: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the queue tables if they do not exist
    Init,
    /// Submit a print job
    Submit(submit::SubmitArgs),
    /// Inspect and edit queue entries
    Queue(queue::QueueArgs),
    /// Retry reconciliation
    Reconcile(reconcile::ReconcileArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = load_config(&self.config, self.env.as_deref())?;
        match &self.command {
            Commands::Init => init::execute(&config).await,
            Commands::Submit(args) => submit::execute(args, &config, self.format).await,
            Commands::Queue(args) => queue::execute(args, &config, self.format).await,
            Commands::Reconcile(args) => reconcile::execute(args, &config, self.format).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str, env: Option<&str>) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path, env)
        .map_err(|e| AppError::configuration(format!("Failed to load config: {}", e)))
}

/// Helper: open the queue store and make sure its tables exist
pub async fn open_store(config: &AppConfig) -> Result<Arc<JobStore>, AppError> {
    tracing::debug!(path = %config.database.path, "Opening queue store");
    let pool = DatabasePool::connect(&config.database).await?;
    let store = JobStore::new(pool);
    store.initialize().await?;
    Ok(Arc::new(store))
}
