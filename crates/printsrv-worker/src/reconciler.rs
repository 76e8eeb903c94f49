//! One reconciliation pass: re-dispatch undelivered entries in a window.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use printsrv_core::config::ReconcilerConfig;
use printsrv_core::error::AppError;
use printsrv_core::result::AppResult;
use printsrv_core::traits::Dispatcher;
use printsrv_core::types::Timestamp;
use printsrv_database::JobStore;
use printsrv_entity::queue::QueueEntry;

use crate::window::{ScanWindow, WindowPolicy};

/// Status written when an eligible entry has no payload to send.
pub const STATUS_NO_PAYLOAD: &str = "retry attempted but no payload";

/// Status written when a retry reached the device.
pub const STATUS_RETRY_SUCCEEDED: &str = "successful on retry";

/// Status written when a retry failed.
pub fn retry_failed_status(reason: &str) -> String {
    format!("failed on retry: {reason}")
}

/// What happened to one entry during a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Dispatched and marked complete.
    Delivered,
    /// Dispatch failed; left incomplete for the next window.
    Failed,
    /// No payload; recorded and skipped.
    Anomaly,
}

/// Summary of a finished pass.
#[derive(Debug, Clone, Serialize)]
pub struct PassReport {
    /// The window this pass scanned.
    pub window: ScanWindow,
    /// Incomplete entries found in the window.
    pub scanned: usize,
    /// Entries delivered and completed.
    pub delivered: usize,
    /// Entries whose dispatch failed.
    pub failed: usize,
    /// Entries skipped for lack of payload.
    pub anomalies: usize,
    /// Entries whose status/completion write failed.
    pub write_errors: usize,
}

/// Retries undelivered queue entries, at most once per window.
///
/// Only one reconciler may run against a given store; two would compute
/// overlapping windows and could double-dispatch.
#[derive(Debug)]
pub struct Reconciler {
    store: Arc<JobStore>,
    dispatcher: Arc<dyn Dispatcher>,
    policy: WindowPolicy,
    job_id: String,
}

impl Reconciler {
    /// Create a reconciler with an explicit identity and window policy.
    pub fn new(
        store: Arc<JobStore>,
        dispatcher: Arc<dyn Dispatcher>,
        job_id: impl Into<String>,
        policy: WindowPolicy,
    ) -> Self {
        Self {
            store,
            dispatcher,
            policy,
            job_id: job_id.into(),
        }
    }

    /// Create a reconciler from the `[reconciler]` configuration section.
    pub fn from_config(
        store: Arc<JobStore>,
        dispatcher: Arc<dyn Dispatcher>,
        config: &ReconcilerConfig,
    ) -> Self {
        Self::new(
            store,
            dispatcher,
            config.job_id.clone(),
            WindowPolicy::from_config(config),
        )
    }

    /// Checkpoint identity of this reconciler.
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Run one pass using the wall clock.
    pub async fn run_pass(&self) -> AppResult<PassReport> {
        self.run_pass_at(Timestamp::now()).await
    }

    /// Run one pass as if it started at `now`.
    ///
    /// Per-entry failures are counted and the sweep moves on. Failing to
    /// read the checkpoint, query the window, or write the checkpoint
    /// aborts the pass; the stale checkpoint makes the next pass re-cover
    /// the same span.
    pub async fn run_pass_at(&self, now: Timestamp) -> AppResult<PassReport> {
        let last_run = self.store.get_checkpoint(&self.job_id).await?;
        let window = self.policy.compute(now, last_run);

        debug!(
            job_id = %self.job_id,
            window.start = %window.scan_start,
            window.end = %window.scan_end,
            "Scanning for undelivered entries"
        );

        let entries = self
            .store
            .query_incomplete_between(window.scan_start, window.scan_end)
            .await?;

        let mut report = PassReport {
            window,
            scanned: entries.len(),
            delivered: 0,
            failed: 0,
            anomalies: 0,
            write_errors: 0,
        };

        for entry in &entries {
            match self.retry_entry(entry).await {
                Ok(EntryOutcome::Delivered) => report.delivered += 1,
                Ok(EntryOutcome::Failed) => report.failed += 1,
                Ok(EntryOutcome::Anomaly) => report.anomalies += 1,
                Err(e) => {
                    error!(entry.id = %entry.id, "Failed to record retry outcome: {}", e);
                    report.write_errors += 1;
                }
            }
        }

        self.store.set_checkpoint(&self.job_id, now).await?;

        if report.scanned > 0 {
            info!(
                job_id = %self.job_id,
                scanned = report.scanned,
                delivered = report.delivered,
                failed = report.failed,
                anomalies = report.anomalies,
                write_errors = report.write_errors,
                "Reconciliation pass finished"
            );
        } else {
            debug!(job_id = %self.job_id, "Reconciliation pass found nothing to retry");
        }

        Ok(report)
    }

    /// Retry a single entry and record the outcome.
    ///
    /// Dispatch runs without holding the storage lock; only the status and
    /// completion writes take it. Status is written before completion so a
    /// crash in between leaves the entry retry-eligible.
    async fn retry_entry(&self, entry: &QueueEntry) -> AppResult<EntryOutcome> {
        let Some(payload) = entry.payload_bytes() else {
            let anomaly =
                AppError::data_anomaly(format!("Retry-eligible entry {} has no payload", entry.id));
            warn!(entry.id = %entry.id, "{}", anomaly);
            self.store.set_status(entry.id, STATUS_NO_PAYLOAD).await?;
            return Ok(EntryOutcome::Anomaly);
        };

        match self.dispatcher.dispatch(payload).await {
            Ok(()) => {
                self.store.set_status(entry.id, STATUS_RETRY_SUCCEEDED).await?;
                self.store.complete(entry.id).await?;
                debug!(entry.id = %entry.id, "Retry delivered");
                Ok(EntryOutcome::Delivered)
            }
            Err(e) => {
                let err = AppError::from(e);
                warn!(
                    entry.id = %entry.id,
                    dispatcher = self.dispatcher.name(),
                    "Retry failed: {}",
                    err
                );
                self.store
                    .set_status(entry.id, &retry_failed_status(&err.message))
                    .await?;
                Ok(EntryOutcome::Failed)
            }
        }
    }
}
