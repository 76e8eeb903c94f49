//! Schema creation for the queue store.

use sqlx::SqlitePool;
use tracing::info;

use printsrv_core::error::{AppError, ErrorKind};

/// Apply all embedded migrations. Safe to call on every start.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    info!("Running database migrations...");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Persistence,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!("Database migrations completed successfully");
    Ok(())
}
