//! Scan window selection for reconciliation passes.

use chrono::Duration;
use serde::Serialize;

use printsrv_core::config::ReconcilerConfig;
use printsrv_core::types::Timestamp;

/// How far back a pass looks and how much it shifts its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPolicy {
    /// Upper bound on history scanned once a checkpoint exists.
    pub lookback: Duration,
    /// History scanned when no checkpoint exists yet.
    pub first_run_lookback: Duration,
    /// Both bounds move back by this much.
    pub guard: Duration,
}

/// The created-at range a single pass will scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanWindow {
    /// Unshifted window start.
    pub window_start: Timestamp,
    /// Unshifted window end (the pass start time).
    pub window_end: Timestamp,
    /// `window_start - guard`, inclusive.
    pub scan_start: Timestamp,
    /// `window_end - guard`, inclusive.
    pub scan_end: Timestamp,
}

impl WindowPolicy {
    /// Policy with the reference constants: 7 days, ~100 years, 1 second.
    pub fn standard() -> Self {
        Self::from_config(&ReconcilerConfig::default())
    }

    /// Policy from the `[reconciler]` configuration section.
    pub fn from_config(config: &ReconcilerConfig) -> Self {
        Self {
            lookback: Duration::days(i64::from(config.lookback_days)),
            first_run_lookback: Duration::days(i64::from(config.first_run_lookback_days)),
            guard: i64::try_from(config.guard_seconds)
                .ok()
                .and_then(Duration::try_seconds)
                .unwrap_or(Duration::MAX),
        }
    }

    /// Choose the window for a pass starting at `now`.
    ///
    /// Without a checkpoint the window reaches back `first_run_lookback`.
    /// With one it starts at `max(now - lookback, last_run)`, never later
    /// than `now`.
    pub fn compute(&self, now: Timestamp, last_run: Option<Timestamp>) -> ScanWindow {
        let window_start = match last_run {
            None => now - self.first_run_lookback,
            Some(last_run) => (now - self.lookback).max(last_run).min(now),
        };

        ScanWindow {
            window_start,
            window_end: now,
            scan_start: window_start - self.guard,
            scan_end: now - self.guard,
        }
    }
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self::standard()
    }
}
