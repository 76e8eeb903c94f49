//! Queue entry model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use printsrv_core::types::{EntryId, Timestamp};

/// One submitted print job and its delivery lifecycle.
///
/// An entry with `completed_at` set is terminal. `status` is a free-text
/// note about the last known outcome and never drives control flow.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QueueEntry {
    /// Store-assigned identifier.
    pub id: EntryId,
    /// When the entry was created. Immutable.
    pub created_at: Timestamp,
    /// When delivery was confirmed, if ever.
    pub completed_at: Option<Timestamp>,
    /// Last known outcome, last write wins.
    pub status: Option<String>,
    /// Fully encoded job content.
    #[serde(skip)]
    pub payload: Option<Vec<u8>>,
}

impl QueueEntry {
    /// Whether delivery has been confirmed.
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    /// The payload, if present and non-empty.
    pub fn payload_bytes(&self) -> Option<&[u8]> {
        self.payload.as_deref().filter(|p| !p.is_empty())
    }

    /// Payload size in bytes (zero when absent).
    pub fn payload_len(&self) -> usize {
        self.payload.as_ref().map_or(0, Vec::len)
    }
}
