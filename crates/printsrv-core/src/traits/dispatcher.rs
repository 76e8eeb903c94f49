//! Dispatcher trait for one-shot delivery to an output device.

use async_trait::async_trait;
use thiserror::Error;

use crate::error::{AppError, ErrorKind};

/// Why a single delivery attempt did not reach the device.
///
/// The queue treats every variant the same way: the `Display` text is
/// recorded as the entry's status and the entry stays retry-eligible.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The device could not be reached.
    #[error("connect to {address} failed: {source}")]
    Connect {
        /// Address that was dialled.
        address: String,
        /// Underlying socket error.
        #[source]
        source: std::io::Error,
    },

    /// The connection broke while sending the payload.
    #[error("write failed: {0}")]
    Write(#[source] std::io::Error),

    /// The device did not answer within the adapter's own deadline.
    #[error("timed out after {0}s")]
    Timeout(u64),

    /// The adapter refused the payload without contacting the device.
    #[error("rejected: {0}")]
    Rejected(String),
}

impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        let message = err.to_string();
        AppError::with_source(ErrorKind::Dispatch, message, err)
    }
}

/// A one-shot delivery channel to the physical output device.
///
/// Implementations must accept arbitrary binary content. Delivery is
/// fire-and-forget from the queue's point of view: `Ok(())` means the
/// bytes were handed off, not that paper came out.
#[async_trait]
pub trait Dispatcher: Send + Sync + std::fmt::Debug + 'static {
    /// Short name used in logs (e.g. `"network"`).
    fn name(&self) -> &str;

    /// Attempt to deliver `payload` once.
    async fn dispatch(&self, payload: &[u8]) -> Result<(), DispatchError>;
}
