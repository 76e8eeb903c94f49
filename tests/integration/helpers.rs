//! Shared test helpers for integration tests.

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use tempfile::TempDir;
use tokio::sync::Notify;

use printsrv_core::config::DatabaseConfig;
use printsrv_core::traits::{DispatchError, Dispatcher};
use printsrv_core::types::{EntryId, Timestamp};
use printsrv_database::{DatabasePool, JobStore};
use printsrv_entity::queue::QueueEntry;

/// Reconciler identity used throughout the tests.
pub const JOB_ID: &str = "PrintQueueRetryJob_60Sec";

/// A queue store on a fresh SQLite file that lives as long as this value.
pub struct TestStore {
    /// The store under test
    pub store: Arc<JobStore>,
    config: DatabaseConfig,
    _dir: TempDir,
}

impl TestStore {
    /// Open and initialize a store in a new temporary directory.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = DatabaseConfig {
            path: dir.path().join("queue.db").to_string_lossy().into_owned(),
            ..DatabaseConfig::default()
        };

        let pool = DatabasePool::connect(&config)
            .await
            .expect("Failed to open test database");
        let store = JobStore::new(pool);
        store.initialize().await.expect("Failed to initialize store");

        Self {
            store: Arc::new(store),
            config,
            _dir: dir,
        }
    }

    /// A second connection pool on the same file, for inspecting or
    /// tampering with rows behind the store's back.
    pub async fn raw_pool(&self) -> SqlitePool {
        DatabasePool::connect(&self.config)
            .await
            .expect("Failed to open raw pool")
            .pool()
            .clone()
    }

    /// Insert an entry with explicit timestamps.
    pub async fn seed(
        &self,
        created_at: Timestamp,
        completed_at: Option<Timestamp>,
        payload: Option<&[u8]>,
    ) -> QueueEntry {
        let entry = QueueEntry {
            id: EntryId::new(),
            created_at,
            completed_at,
            status: None,
            payload: payload.map(<[u8]>::to_vec),
        };
        self.store
            .insert(&entry)
            .await
            .expect("Failed to seed entry");
        entry
    }
}

/// `now` shifted by `seconds` (negative is the past).
pub fn now_plus(seconds: i64) -> Timestamp {
    Timestamp::from(Utc::now() + Duration::seconds(seconds))
}

/// `base` shifted by `seconds`.
pub fn shift(base: Timestamp, seconds: i64) -> Timestamp {
    Timestamp::from(base.as_datetime() + Duration::seconds(seconds))
}

/// Dispatcher double that records payloads and fails on demand.
#[derive(Debug, Default)]
pub struct ScriptedDispatcher {
    fail_all: Mutex<bool>,
    fail_on: Mutex<Option<Vec<u8>>>,
    sent: Mutex<Vec<Vec<u8>>>,
}

impl ScriptedDispatcher {
    /// Every dispatch succeeds.
    pub fn succeeding() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every dispatch fails with "printer offline".
    pub fn failing() -> Arc<Self> {
        let dispatcher = Self::default();
        *dispatcher.fail_all.lock().unwrap() = true;
        Arc::new(dispatcher)
    }

    /// Only dispatches of exactly `payload` fail.
    pub fn failing_on(payload: &[u8]) -> Arc<Self> {
        let dispatcher = Self::default();
        *dispatcher.fail_on.lock().unwrap() = Some(payload.to_vec());
        Arc::new(dispatcher)
    }

    /// Payloads received so far, in call order.
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.lock().unwrap().clone()
    }

    /// Number of dispatch calls so far.
    pub fn calls(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Dispatcher for ScriptedDispatcher {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn dispatch(&self, payload: &[u8]) -> Result<(), DispatchError> {
        self.sent.lock().unwrap().push(payload.to_vec());

        let fail_all = *self.fail_all.lock().unwrap();
        let fail_this = self.fail_on.lock().unwrap().as_deref() == Some(payload);
        if fail_all || fail_this {
            Err(DispatchError::Rejected("printer offline".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Dispatcher that signals when it starts and then waits to be released.
#[derive(Debug, Default)]
pub struct ParkedDispatcher {
    /// Notified once dispatch has begun.
    pub entered: Notify,
    /// Dispatch returns `Ok` after this is notified.
    pub release: Notify,
}

#[async_trait]
impl Dispatcher for ParkedDispatcher {
    fn name(&self) -> &str {
        "parked"
    }

    async fn dispatch(&self, _payload: &[u8]) -> Result<(), DispatchError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(())
    }
}

/// Dispatcher that deletes the row holding `victim` while "printing" it,
/// so the reconciler's follow-up write finds nothing.
#[derive(Debug)]
pub struct RowDeletingDispatcher {
    pool: SqlitePool,
    victim: Vec<u8>,
    sent: Mutex<Vec<Vec<u8>>>,
}

impl RowDeletingDispatcher {
    /// Delete whichever entry carries `victim` when it is dispatched.
    pub fn new(pool: SqlitePool, victim: &[u8]) -> Arc<Self> {
        Arc::new(Self {
            pool,
            victim: victim.to_vec(),
            sent: Mutex::new(Vec::new()),
        })
    }

    /// Payloads received so far, in call order.
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Dispatcher for RowDeletingDispatcher {
    fn name(&self) -> &str {
        "row-deleting"
    }

    async fn dispatch(&self, payload: &[u8]) -> Result<(), DispatchError> {
        self.sent.lock().unwrap().push(payload.to_vec());
        if payload == self.victim.as_slice() {
            sqlx::query("DELETE FROM queue_entry WHERE payload = ?1")
                .bind(payload)
                .execute(&self.pool)
                .await
                .map_err(|e| DispatchError::Rejected(e.to_string()))?;
        }
        Ok(())
    }
}
