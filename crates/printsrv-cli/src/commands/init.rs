//! Storage initialization command.

use crate::output;
use printsrv_core::config::AppConfig;
use printsrv_core::error::AppError;

/// Execute the init command
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    println!("Initializing queue store at {}...", config.database.path);
    super::open_store(config).await?;
    output::print_success("Queue store ready.");
    Ok(())
}
