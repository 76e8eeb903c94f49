//! Queue entry repository implementation.

use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::debug;

use printsrv_core::error::{AppError, ErrorKind};
use printsrv_core::result::AppResult;
use printsrv_core::types::{EntryId, Timestamp};
use printsrv_entity::queue::QueueEntry;

use crate::connection::DatabasePool;
use crate::serializer::WriteSerializer;

const SELECT_COLUMNS: &str = "SELECT id, created_at, completed_at, status, payload FROM queue_entry";

/// Repository for the `queue_entry` table.
///
/// Every method holds the shared [`WriteSerializer`] for its full duration,
/// so each call is atomic with respect to every other store call. Sequences
/// of calls are not.
#[derive(Debug, Clone)]
pub struct QueueRepository {
    pool: SqlitePool,
    serializer: Arc<WriteSerializer>,
}

impl QueueRepository {
    /// Create a new queue repository.
    pub fn new(db: &DatabasePool) -> Self {
        Self {
            pool: db.pool().clone(),
            serializer: db.serializer(),
        }
    }

    /// Insert a fully built entry.
    pub async fn insert(&self, entry: &QueueEntry) -> AppResult<()> {
        let _guard = self.serializer.acquire("queue.insert").await;
        sqlx::query(
            "INSERT INTO queue_entry (id, created_at, completed_at, status, payload) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(entry.id)
        .bind(entry.created_at)
        .bind(entry.completed_at)
        .bind(entry.status.as_deref())
        .bind(entry.payload.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Persistence, "Failed to create entry", e))?;

        debug!(entry.id = %entry.id, bytes = entry.payload_len(), "Queue entry created");
        Ok(())
    }

    /// Find an entry by ID.
    pub async fn find_by_id(&self, id: EntryId) -> AppResult<Option<QueueEntry>> {
        let _guard = self.serializer.acquire("queue.find_by_id").await;
        sqlx::query_as::<_, QueueEntry>(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Persistence, "Failed to find entry", e))
    }

    /// Stamp `completed_at`. An existing value is kept, so repeated calls
    /// never move it backwards or clear it.
    pub async fn mark_completed(&self, id: EntryId, at: Timestamp) -> AppResult<()> {
        let _guard = self.serializer.acquire("queue.mark_completed").await;
        let result = sqlx::query(
            "UPDATE queue_entry SET completed_at = COALESCE(completed_at, ?2) WHERE id = ?1",
        )
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Persistence, "Failed to complete entry", e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Queue entry {id} not found")));
        }
        debug!(entry.id = %id, "Queue entry completed");
        Ok(())
    }

    /// Overwrite the status note. Leaves `completed_at` untouched.
    pub async fn update_status(&self, id: EntryId, status: &str) -> AppResult<()> {
        let _guard = self.serializer.acquire("queue.update_status").await;
        let result = sqlx::query("UPDATE queue_entry SET status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Persistence, "Failed to update entry status", e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Queue entry {id} not found")));
        }
        debug!(entry.id = %id, status, "Queue entry status updated");
        Ok(())
    }

    /// Entries with no `completed_at` whose `created_at` lies in
    /// `[start, end]`, inclusive on both ends. Order is unspecified.
    pub async fn find_incomplete_between(
        &self,
        start: Timestamp,
        end: Timestamp,
    ) -> AppResult<Vec<QueueEntry>> {
        let _guard = self.serializer.acquire("queue.find_incomplete_between").await;
        sqlx::query_as::<_, QueueEntry>(&format!(
            "{SELECT_COLUMNS} WHERE completed_at IS NULL AND created_at >= ?1 AND created_at <= ?2"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Persistence, "Failed to query incomplete entries", e)
        })
    }

    /// Most recent incomplete entries, newest first.
    pub async fn find_incomplete(&self, limit: u32) -> AppResult<Vec<QueueEntry>> {
        let _guard = self.serializer.acquire("queue.find_incomplete").await;
        sqlx::query_as::<_, QueueEntry>(&format!(
            "{SELECT_COLUMNS} WHERE completed_at IS NULL ORDER BY created_at DESC LIMIT ?1"
        ))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Persistence, "Failed to list incomplete entries", e)
        })
    }

    /// Number of entries still awaiting delivery.
    pub async fn count_incomplete(&self) -> AppResult<i64> {
        let _guard = self.serializer.acquire("queue.count_incomplete").await;
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM queue_entry WHERE completed_at IS NULL")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Persistence, "Failed to count entries", e)
            })
    }
}
