//! The durable print queue: one facade over both tables.

use tracing::info;

use printsrv_core::error::AppError;
use printsrv_core::result::AppResult;
use printsrv_core::types::{EntryId, Timestamp};
use printsrv_entity::queue::QueueEntry;

use crate::connection::DatabasePool;
use crate::migration;
use crate::repositories::{CheckpointRepository, QueueRepository};

/// Owns the queue entries and reconciliation checkpoints.
///
/// Other components never touch the tables directly. Every operation is
/// serialized through the pool's [`WriteSerializer`](crate::WriteSerializer).
#[derive(Debug, Clone)]
pub struct JobStore {
    db: DatabasePool,
    queue: QueueRepository,
    checkpoints: CheckpointRepository,
}

impl JobStore {
    /// Build a store on top of an open pool.
    pub fn new(db: DatabasePool) -> Self {
        let queue = QueueRepository::new(&db);
        let checkpoints = CheckpointRepository::new(&db);
        Self {
            db,
            queue,
            checkpoints,
        }
    }

    /// Ensure both tables exist. Idempotent.
    pub async fn initialize(&self) -> AppResult<()> {
        let serializer = self.db.serializer();
        let _guard = serializer.acquire("store.initialize").await;
        migration::run_migrations(self.db.pool()).await?;
        info!("Queue store initialized");
        Ok(())
    }

    /// Persist a new entry for `payload` and return it.
    ///
    /// The entry is returned only after the insert succeeded.
    pub async fn create(&self, payload: &[u8]) -> AppResult<QueueEntry> {
        let entry = QueueEntry {
            id: EntryId::new(),
            created_at: Timestamp::now(),
            completed_at: None,
            status: None,
            payload: Some(payload.to_vec()),
        };
        self.queue.insert(&entry).await?;
        Ok(entry)
    }

    /// Fetch one entry; `NotFound` if no row matches.
    pub async fn get(&self, id: EntryId) -> AppResult<QueueEntry> {
        self.queue
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Queue entry {id} not found")))
    }

    /// Mark an entry delivered now; `NotFound` if no row matches.
    pub async fn complete(&self, id: EntryId) -> AppResult<()> {
        self.queue.mark_completed(id, Timestamp::now()).await
    }

    /// Overwrite an entry's status note; `NotFound` if no row matches.
    pub async fn set_status(&self, id: EntryId, message: &str) -> AppResult<()> {
        self.queue.update_status(id, message).await
    }

    /// Incomplete entries created within `[start, end]`, inclusive.
    pub async fn query_incomplete_between(
        &self,
        start: Timestamp,
        end: Timestamp,
    ) -> AppResult<Vec<QueueEntry>> {
        self.queue.find_incomplete_between(start, end).await
    }

    /// Newest incomplete entries, for operators.
    pub async fn list_incomplete(&self, limit: u32) -> AppResult<Vec<QueueEntry>> {
        self.queue.find_incomplete(limit).await
    }

    /// Number of entries awaiting delivery.
    pub async fn count_incomplete(&self) -> AppResult<i64> {
        self.queue.count_incomplete().await
    }

    /// When the reconciler `job_id` last finished a pass, if ever.
    pub async fn get_checkpoint(&self, job_id: &str) -> AppResult<Option<Timestamp>> {
        Ok(self
            .checkpoints
            .find(job_id)
            .await?
            .and_then(|checkpoint| checkpoint.last_run_at))
    }

    /// Record that reconciler `job_id` finished a pass started at `at`.
    pub async fn set_checkpoint(&self, job_id: &str, at: Timestamp) -> AppResult<()> {
        self.checkpoints.upsert(job_id, at).await
    }

    /// Persist a fully built entry, keeping its id and timestamps.
    ///
    /// Used to carry entries over from another store or to seed a queue
    /// with known creation times. Callers on the request path use
    /// [`JobStore::create`].
    pub async fn insert(&self, entry: &QueueEntry) -> AppResult<()> {
        self.queue.insert(entry).await
    }
}
