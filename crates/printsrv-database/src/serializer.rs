//! Process-wide exclusive lock around storage access.
//!
//! SQLite is not assumed to tolerate concurrent writers on separate
//! connections, so every statement against the queue or checkpoint
//! tables runs while holding the single [`WriteSerializer`] shared by all
//! repositories built from the same [`DatabasePool`](crate::DatabasePool).

use tokio::sync::{Mutex, MutexGuard};
use tracing::trace;

/// Serializes access to the underlying SQLite connection family.
///
/// The guard returned by [`WriteSerializer::acquire`] releases the lock
/// when dropped, so every exit path (success, `?`, panic unwind) frees it.
#[derive(Debug, Default)]
pub struct WriteSerializer {
    lock: Mutex<()>,
}

/// Held for the duration of one storage operation.
#[derive(Debug)]
pub struct SerializerGuard<'a> {
    _guard: MutexGuard<'a, ()>,
    operation: &'static str,
}

impl WriteSerializer {
    /// Create an unlocked serializer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access. Fairness is whatever `tokio::sync::Mutex`
    /// provides (FIFO among waiters).
    pub async fn acquire(&self, operation: &'static str) -> SerializerGuard<'_> {
        let guard = self.lock.lock().await;
        trace!(operation, "Storage lock acquired");
        SerializerGuard {
            _guard: guard,
            operation,
        }
    }

    /// Whether some operation currently holds the lock.
    pub fn is_locked(&self) -> bool {
        self.lock.try_lock().is_err()
    }
}

impl Drop for SerializerGuard<'_> {
    fn drop(&mut self) {
        trace!(operation = self.operation, "Storage lock released");
    }
}
