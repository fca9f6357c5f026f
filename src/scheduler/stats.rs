//! Counters kept by the polling loop.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Polling loop statistics, returned by the worker when it stops.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchedulerStats {
    pub started_at: DateTime<Utc>,
    /// Loop iterations, including skipped ones.
    pub ticks: u64,
    pub successful_reads: u64,
    /// Ticks skipped because the controller could not be read.
    pub failed_reads: u64,
    pub events_emitted: u64,
    pub emit_failures: u64,
}

impl Default for SchedulerStats {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulerStats {
    #[must_use]
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            ticks: 0,
            successful_reads: 0,
            failed_reads: 0,
            events_emitted: 0,
            emit_failures: 0,
        }
    }

    /// Wall-clock time since the stats were created.
    #[must_use]
    pub fn uptime(&self) -> chrono::Duration {
        Utc::now() - self.started_at
    }

    /// One-line JSON summary.
    ///
    /// # Errors
    ///
    /// Propagates serialization errors from `serde_json`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
