//! Retry reconciler configuration.

use serde::{Deserialize, Serialize};

/// Background retry reconciler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Whether the reconciler loop runs in the server.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds between reconciliation passes.
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
    /// Checkpoint identity of this reconciler.
    #[serde(default = "default_job_id")]
    pub job_id: String,
    /// Maximum history scanned when a checkpoint exists, in days.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
    /// Both scan bounds are shifted back by this many seconds.
    #[serde(default = "default_guard_seconds")]
    pub guard_seconds: u64,
    /// History scanned on the very first pass, in days.
    #[serde(default = "default_first_run_lookback_days")]
    pub first_run_lookback_days: u32,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            interval_seconds: default_interval(),
            job_id: default_job_id(),
            lookback_days: default_lookback_days(),
            guard_seconds: default_guard_seconds(),
            first_run_lookback_days: default_first_run_lookback_days(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_interval() -> u64 {
    60
}

fn default_job_id() -> String {
    "PrintQueueRetryJob_60Sec".to_string()
}

fn default_lookback_days() -> u32 {
    7
}

fn default_guard_seconds() -> u64 {
    1
}

fn default_first_run_lookback_days() -> u32 {
    365 * 100
}
