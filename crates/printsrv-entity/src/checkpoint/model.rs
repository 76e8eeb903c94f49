//! Reconciliation checkpoint model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use printsrv_core::types::Timestamp;

/// Marker of when a reconciler identity last finished a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ReconcilerCheckpoint {
    /// Reconciler identity (not a queue entry id).
    pub job_id: String,
    /// Start time of the most recent completed pass.
    pub last_run_at: Option<Timestamp>,
}
