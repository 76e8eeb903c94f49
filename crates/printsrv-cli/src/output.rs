//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use printsrv_entity::queue::QueueEntry;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// One queue entry flattened for display.
#[derive(Debug, Serialize, Tabled)]
pub struct EntryRow {
    /// Entry id
    pub id: String,
    /// Created at
    pub created_at: String,
    /// Completed at, or `-`
    pub completed_at: String,
    /// Status note, or `-`
    pub status: String,
    /// Payload size
    pub bytes: usize,
}

impl From<&QueueEntry> for EntryRow {
    fn from(entry: &QueueEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            created_at: entry.created_at.to_string(),
            completed_at: entry
                .completed_at
                .map_or_else(|| "-".to_string(), |t| t.to_string()),
            status: entry.status.clone().unwrap_or_else(|| "-".to_string()),
            bytes: entry.payload_len(),
        }
    }
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                let table = Table::new(items).to_string();
                println!("{}", table);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{}", json);
        }
    }
}

/// Print a single item in the selected format
pub fn print_item<T: Serialize + std::fmt::Debug>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            println!("{:#?}", item);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(item).unwrap_or_else(|_| "{}".to_string());
            println!("{}", json);
        }
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {}", msg);
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{}:", key), value);
}
