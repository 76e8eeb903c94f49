//! Print job submission command.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use crate::output::{self, OutputFormat};
use printsrv_core::config::AppConfig;
use printsrv_core::error::AppError;
use printsrv_printer::NetworkPrinter;
use printsrv_service::PrintService;

/// Arguments for the submit command
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct SubmitArgs {
    /// File holding an already encoded payload
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Single line of text to print centred
    #[arg(long)]
    pub text: Option<String>,
}

/// Execute the submit command
pub async fn execute(
    args: &SubmitArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let store = super::open_store(config).await?;
    let printer = Arc::new(NetworkPrinter::new(&config.printer));
    let service = PrintService::new(store, printer);

    let receipt = match (&args.file, &args.text) {
        (Some(path), _) => {
            let payload = tokio::fs::read(path).await?;
            service.submit(&payload).await?
        }
        (None, Some(text)) => service.submit_text(text).await?,
        (None, None) => return Err(AppError::validation("Either --file or --text is required")),
    };

    match format {
        OutputFormat::Json => output::print_item(&receipt, format),
        OutputFormat::Table => {
            if receipt.delivered {
                output::print_success(&format!("Job {} printed", receipt.entry.id));
            } else {
                output::print_warning(&format!(
                    "Job {} queued for retry: {}",
                    receipt.entry.id,
                    receipt.error.as_deref().unwrap_or("unknown error")
                ));
            }
        }
    }

    Ok(())
}
