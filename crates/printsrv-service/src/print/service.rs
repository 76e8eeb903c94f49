//! Persist-then-dispatch submission of print jobs.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use printsrv_core::error::AppError;
use printsrv_core::traits::Dispatcher;
use printsrv_database::JobStore;
use printsrv_entity::queue::QueueEntry;
use printsrv_printer::CommandBuilder;

/// Result of a submission. The job is accepted once it is persisted,
/// whether or not the first delivery attempt worked.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitReceipt {
    /// The entry as created.
    pub entry: QueueEntry,
    /// Whether the immediate dispatch succeeded.
    pub delivered: bool,
    /// Failure text recorded as the entry's status, if any.
    pub error: Option<String>,
}

/// Accepts print jobs from the request path.
#[derive(Debug, Clone)]
pub struct PrintService {
    /// Durable queue.
    store: Arc<JobStore>,
    /// Output device.
    dispatcher: Arc<dyn Dispatcher>,
}

impl PrintService {
    /// Creates a new print service.
    pub fn new(store: Arc<JobStore>, dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self { store, dispatcher }
    }

    /// Persists an encoded payload, then makes one delivery attempt.
    ///
    /// Fails only if the entry cannot be persisted or the outcome cannot be
    /// recorded. A dispatch failure is stored as the entry's status and left
    /// for the reconciler.
    pub async fn submit(&self, payload: &[u8]) -> Result<SubmitReceipt, AppError> {
        let entry = self.store.create(payload).await?;

        match self.dispatcher.dispatch(payload).await {
            Ok(()) => {
                self.store.complete(entry.id).await?;
                info!(entry.id = %entry.id, bytes = payload.len(), "Print job delivered");
                Ok(SubmitReceipt {
                    entry,
                    delivered: true,
                    error: None,
                })
            }
            Err(e) => {
                let err = AppError::from(e);
                warn!(entry.id = %entry.id, "Print job queued for retry: {}", err);
                self.store.set_status(entry.id, &err.message).await?;
                Ok(SubmitReceipt {
                    entry,
                    delivered: false,
                    error: Some(err.message),
                })
            }
        }
    }

    /// Submits a single centred line of text.
    pub async fn submit_text(&self, text: &str) -> Result<SubmitReceipt, AppError> {
        if text.trim().is_empty() {
            return Err(AppError::validation("Text to print must not be empty"));
        }

        let payload = CommandBuilder::new().align_center().print_line(text).build();
        self.submit(&payload).await
    }
}
