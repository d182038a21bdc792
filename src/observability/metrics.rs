//! Metrics registry
//!
//! - Counters only
//! - Monotonic increase
//! - Reset only when the store is created
//! - Thread-safe, lock-free

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for one store
///
/// All counters use `Relaxed` ordering; a snapshot is not a consistent cut
/// across counters.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Find, count and matching-mutation executions that succeeded
    queries_executed: AtomicU64,
    /// Executions that returned an error
    queries_failed: AtomicU64,
    /// Candidate records read by executions
    records_scanned: AtomicU64,
    /// Records that satisfied every criterion, before windowing
    records_matched: AtomicU64,
    records_inserted: AtomicU64,
    records_updated: AtomicU64,
    records_deleted: AtomicU64,
    /// Write transactions rolled back after a failure
    rollbacks: AtomicU64,
    /// Executions served by a secondary index
    index_scans: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_queries_executed(&self) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_failed(&self) {
        self.queries_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one execution's scanned and matched counts
    pub fn add_scanned(&self, scanned: u64, matched: u64) {
        self.records_scanned.fetch_add(scanned, Ordering::Relaxed);
        self.records_matched.fetch_add(matched, Ordering::Relaxed);
    }

    pub fn add_inserted(&self, count: u64) {
        self.records_inserted.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_updated(&self, count: u64) {
        self.records_updated.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_deleted(&self, count: u64) {
        self.records_deleted.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_rollbacks(&self) {
        self.rollbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_index_scans(&self) {
        self.index_scans.fetch_add(1, Ordering::Relaxed);
    }

    /// Current values of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queries_executed: self.queries_executed.load(Ordering::Relaxed),
            queries_failed: self.queries_failed.load(Ordering::Relaxed),
            records_scanned: self.records_scanned.load(Ordering::Relaxed),
            records_matched: self.records_matched.load(Ordering::Relaxed),
            records_inserted: self.records_inserted.load(Ordering::Relaxed),
            records_updated: self.records_updated.load(Ordering::Relaxed),
            records_deleted: self.records_deleted.load(Ordering::Relaxed),
            rollbacks: self.rollbacks.load(Ordering::Relaxed),
            index_scans: self.index_scans.load(Ordering::Relaxed),
        }
    }

    /// Current values as a JSON object with fixed key order
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }
}

/// A point-in-time copy of all counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub queries_executed: u64,
    pub queries_failed: u64,
    pub records_scanned: u64,
    pub records_matched: u64,
    pub records_inserted: u64,
    pub records_updated: u64,
    pub records_deleted: u64,
    pub rollbacks: u64,
    pub index_scans: u64,
}
