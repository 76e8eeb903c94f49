//! Reconciliation commands.

use std::sync::Arc;

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use printsrv_core::config::AppConfig;
use printsrv_core::error::AppError;
use printsrv_printer::NetworkPrinter;
use printsrv_worker::Reconciler;

/// Arguments for reconcile commands
#[derive(Debug, Args)]
pub struct ReconcileArgs {
    /// Reconcile subcommand
    #[command(subcommand)]
    pub command: ReconcileCommand,
}

/// Reconcile subcommands
#[derive(Debug, Subcommand)]
pub enum ReconcileCommand {
    /// Run exactly one pass now
    Run,
    /// Show when a reconciler last finished a pass
    Checkpoint {
        /// Reconciler identity (defaults to the configured one)
        #[arg(long)]
        job_id: Option<String>,
    },
}

/// Execute reconcile commands
pub async fn execute(
    args: &ReconcileArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let store = super::open_store(config).await?;

    match &args.command {
        ReconcileCommand::Run => {
            let printer = Arc::new(NetworkPrinter::new(&config.printer));
            let reconciler = Reconciler::from_config(store, printer, &config.reconciler);
            let report = reconciler.run_pass().await?;

            match format {
                OutputFormat::Json => output::print_item(&report, format),
                OutputFormat::Table => {
                    println!("Reconciliation Pass:");
                    output::print_kv("Scan Start", &report.window.scan_start.to_string());
                    output::print_kv("Scan End", &report.window.scan_end.to_string());
                    output::print_kv("Scanned", &report.scanned.to_string());
                    output::print_kv("Delivered", &report.delivered.to_string());
                    output::print_kv("Failed", &report.failed.to_string());
                    output::print_kv("No Payload", &report.anomalies.to_string());
                    output::print_kv("Write Errors", &report.write_errors.to_string());
                }
            }
        }
        ReconcileCommand::Checkpoint { job_id } => {
            let job_id = job_id.as_deref().unwrap_or(&config.reconciler.job_id);
            match store.get_checkpoint(job_id).await? {
                Some(at) => output::print_kv(job_id, &at.to_string()),
                None => output::print_warning(&format!("Reconciler '{}' has never run", job_id)),
            }
        }
    }

    Ok(())
}
