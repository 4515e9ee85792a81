//! Per-endpoint attempt metrics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Lock-free counters updated on every dispatch attempt.
///
/// Shared across all jobs talking to one endpoint kind; reads are
/// monotonic snapshots, not a consistent cut.
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    attempts: AtomicU64,
    successes: AtomicU64,
    failures: AtomicU64,
    total_latency_ms: AtomicU64,
}

/// Point-in-time view of the metrics counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Total attempts, retries included
    pub attempts: u64,
    /// Attempts that returned an asset
    pub successes: u64,
    /// Attempts that returned an error
    pub failures: u64,
    /// Mean per-attempt latency in milliseconds
    pub mean_latency_ms: u64,
}

impl DispatchMetrics {
    /// Create zeroed metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one attempt.
    pub fn record_attempt(&self, latency: Duration, success: bool) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        if success {
            self.successes.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
        self.total_latency_ms
            .fetch_add(latency.as_millis() as u64, Ordering::Relaxed);
    }

    /// Take a snapshot of the counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let attempts = self.attempts.load(Ordering::Relaxed);
        let total_latency_ms = self.total_latency_ms.load(Ordering::Relaxed);
        MetricsSnapshot {
            attempts,
            successes: self.successes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            mean_latency_ms: if attempts == 0 {
                0
            } else {
                total_latency_ms / attempts
            },
        }
    }
}
