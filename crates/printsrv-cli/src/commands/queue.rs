//! Queue inspection commands.

use clap::{Args, Subcommand};

use crate::output::{self, EntryRow, OutputFormat};
use printsrv_core::config::AppConfig;
use printsrv_core::error::AppError;
use printsrv_core::types::EntryId;
use printsrv_database::JobStore;

/// Status recorded when an operator closes an entry by hand.
pub const STATUS_COMPLETED_MANUALLY: &str = "completed manually";

/// Arguments for queue commands
#[derive(Debug, Args)]
pub struct QueueArgs {
    /// Queue subcommand
    #[command(subcommand)]
    pub command: QueueCommand,
}

/// Queue subcommands
#[derive(Debug, Subcommand)]
pub enum QueueCommand {
    /// Show queue totals
    Status,
    /// Show a single entry
    Show {
        /// Entry id
        id: String,
    },
    /// List undelivered entries, newest first
    Pending {
        /// Maximum rows to show
        #[arg(short, long, default_value_t = 50)]
        limit: u32,
    },
    /// Mark an entry delivered by hand
    Complete {
        /// Entry id
        id: String,
    },
}

/// Execute queue commands
pub async fn execute(
    args: &QueueArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let store = super::open_store(config).await?;

    match &args.command {
        QueueCommand::Status => {
            let pending = store.count_incomplete().await?;
            let last_run = store.get_checkpoint(&config.reconciler.job_id).await?;

            println!("Print Queue Status:");
            output::print_kv("Pending", &pending.to_string());
            output::print_kv("Reconciler", &config.reconciler.job_id);
            output::print_kv(
                "Last Pass",
                &last_run.map_or_else(|| "never".to_string(), |t| t.to_string()),
            );
            output::print_kv("Printer", &config.printer.address());
        }
        QueueCommand::Show { id } => {
            let entry = store.get(EntryId::parse(id)?).await?;
            output::print_item(&EntryRow::from(&entry), format);
        }
        QueueCommand::Pending { limit } => {
            let rows: Vec<EntryRow> = store
                .list_incomplete(*limit)
                .await?
                .iter()
                .map(EntryRow::from)
                .collect();
            output::print_list(&rows, format);
        }
        QueueCommand::Complete { id } => {
            let id = EntryId::parse(id)?;
            complete_manually(&store, id).await?;
            output::print_success(&format!("Entry {} marked complete", id));
        }
    }

    Ok(())
}

/// Record the manual close, then mark the entry delivered. Status goes
/// first so a failure in between leaves the entry open and retryable.
async fn complete_manually(store: &JobStore, id: EntryId) -> Result<(), AppError> {
    store.set_status(id, STATUS_COMPLETED_MANUALLY).await?;
    store.complete(id).await
}
