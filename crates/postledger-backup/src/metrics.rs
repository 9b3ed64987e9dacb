//! Counters for backup delivery

use std::sync::atomic::{AtomicU64, Ordering};

/// Delivery counters shared between the notifier and its spawned tasks
#[derive(Debug, Default)]
pub struct BackupMetrics {
    dispatched: AtomicU64,
    delivered: AtomicU64,
    failed: AtomicU64,
}

impl BackupMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a snapshot handed to a delivery task
    pub fn record_dispatch(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful delivery
    pub fn record_delivery(&self) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed delivery
    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshots handed to delivery tasks
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    /// Snapshots the sink accepted
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    /// Snapshots the sink rejected
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Deliveries still in flight
    pub fn pending(&self) -> u64 {
        self.dispatched()
            .saturating_sub(self.delivered() + self.failed())
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        [
            "Backup Metrics Summary".to_string(),
            "======================".to_string(),
            format!("Dispatched: {}", self.dispatched()),
            format!("Delivered: {}", self.delivered()),
            format!("Failed: {}", self.failed()),
            format!("Pending: {}", self.pending()),
        ]
        .join("\n")
    }
}
