//! Reconciliation checkpoint repository implementation.

use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::debug;

use printsrv_core::error::{AppError, ErrorKind};
use printsrv_core::result::AppResult;
use printsrv_core::types::Timestamp;
use printsrv_entity::checkpoint::ReconcilerCheckpoint;

use crate::connection::DatabasePool;
use crate::serializer::WriteSerializer;

/// Repository for the `reconciler_checkpoint` table.
#[derive(Debug, Clone)]
pub struct CheckpointRepository {
    pool: SqlitePool,
    serializer: Arc<WriteSerializer>,
}

impl CheckpointRepository {
    /// Create a new checkpoint repository.
    pub fn new(db: &DatabasePool) -> Self {
        Self {
            pool: db.pool().clone(),
            serializer: db.serializer(),
        }
    }

    /// Find the checkpoint row for a reconciler identity.
    pub async fn find(&self, job_id: &str) -> AppResult<Option<ReconcilerCheckpoint>> {
        let _guard = self.serializer.acquire("checkpoint.find").await;
        sqlx::query_as::<_, ReconcilerCheckpoint>(
            "SELECT job_id, last_run_at FROM reconciler_checkpoint WHERE job_id = ?1",
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Persistence, "Failed to read checkpoint", e))
    }

    /// Insert or overwrite the last-run marker. Never creates a second row.
    pub async fn upsert(&self, job_id: &str, last_run_at: Timestamp) -> AppResult<()> {
        let _guard = self.serializer.acquire("checkpoint.upsert").await;
        sqlx::query(
            "INSERT INTO reconciler_checkpoint (job_id, last_run_at) VALUES (?1, ?2) \
             ON CONFLICT(job_id) DO UPDATE SET last_run_at = excluded.last_run_at",
        )
        .bind(job_id)
        .bind(last_run_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Persistence, "Failed to write checkpoint", e)
        })?;

        debug!(job_id, last_run_at = %last_run_at, "Checkpoint advanced");
        Ok(())
    }
}
