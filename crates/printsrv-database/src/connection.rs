//! SQLite connection pool management.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use printsrv_core::config::DatabaseConfig;
use printsrv_core::error::{AppError, ErrorKind};

use crate::serializer::WriteSerializer;

/// Wrapper around the sqlx SQLite pool and the serializer guarding it.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    /// The underlying sqlx connection pool.
    pool: SqlitePool,
    /// Shared by every repository built from this pool.
    serializer: Arc<WriteSerializer>,
}

impl DatabasePool {
    /// Open (creating if missing) the SQLite file named in the configuration.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        info!(
            path = %config.path,
            max_connections = config.max_connections,
            "Opening SQLite queue store"
        );

        if let Some(parent) = Path::new(&config.path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Persistence,
                        format!("Failed to create directory {}", parent.display()),
                        e,
                    )
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(config.busy_timeout_seconds));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Persistence,
                    format!("Failed to open database {}: {e}", config.path),
                    e,
                )
            })?;

        info!("SQLite queue store opened");
        Ok(Self {
            pool,
            serializer: Arc::new(WriteSerializer::new()),
        })
    }

    /// Return a reference to the underlying sqlx pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Return the serializer shared by this pool's repositories.
    pub fn serializer(&self) -> Arc<WriteSerializer> {
        Arc::clone(&self.serializer)
    }

    /// Check database connectivity.
    pub async fn health_check(&self) -> Result<bool, AppError> {
        let _guard = self.serializer.acquire("health_check").await;
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Persistence, "Health check failed", e))
    }

    /// Close all connections in the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}
