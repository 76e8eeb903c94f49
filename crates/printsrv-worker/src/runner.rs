//! Tick loop that runs one reconciliation pass per interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};

use crate::reconciler::Reconciler;

/// Runs reconciliation passes on a fixed tick until stopped.
#[derive(Debug)]
pub struct ReconcilerRunner {
    /// The pass implementation
    reconciler: Arc<Reconciler>,
    /// Time between pass starts
    interval: Duration,
}

impl ReconcilerRunner {
    /// Create a new runner
    pub fn new(reconciler: Arc<Reconciler>, interval: Duration) -> Self {
        Self {
            reconciler,
            interval,
        }
    }

    /// Run until the cancel signal flips to `true` or its sender is dropped.
    ///
    /// The first pass starts immediately. Passes never overlap, and the
    /// stop signal is only observed between passes, so an in-flight sweep
    /// always finishes.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        tracing::info!(
            "Reconciler '{}' started with interval={}s",
            self.reconciler.job_id(),
            self.interval.as_secs()
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while !*cancel.borrow() {
            tokio::select! {
                biased;
                changed = cancel.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }

        tracing::info!("Reconciler '{}' stopped", self.reconciler.job_id());
    }

    /// Run one pass, logging instead of propagating failure.
    async fn tick(&self) {
        if let Err(e) = self.reconciler.run_pass().await {
            tracing::error!(
                "Reconciliation pass for '{}' aborted: {}",
                self.reconciler.job_id(),
                e
            );
        }
    }
}
