//! Executor counters
//!
//! Counters only, monotonic, relaxed ordering. Exact values are read back
//! through [`QueryMetrics::snapshot`].

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters owned by one executor
#[derive(Debug, Default)]
pub struct QueryMetrics {
    /// Requests handed to the transport, retries included
    requests_issued: AtomicU64,
    /// Queries answered locally because they were provably empty
    short_circuits: AtomicU64,
    /// Missing-index create-and-retry recoveries
    index_recoveries: AtomicU64,
    /// Transport errors surfaced to the caller
    transport_failures: AtomicU64,
    /// Documents returned from fetch
    documents_returned: AtomicU64,
}

impl QueryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_requests(&self) {
        self.requests_issued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_short_circuits(&self) {
        self.short_circuits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_index_recoveries(&self) {
        self.index_recoveries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_transport_failures(&self) {
        self.transport_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_documents(&self, count: u64) {
        self.documents_returned.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_issued: self.requests_issued.load(Ordering::Relaxed),
            short_circuits: self.short_circuits.load(Ordering::Relaxed),
            index_recoveries: self.index_recoveries.load(Ordering::Relaxed),
            transport_failures: self.transport_failures.load(Ordering::Relaxed),
            documents_returned: self.documents_returned.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`QueryMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub requests_issued: u64,
    pub short_circuits: u64,
    pub index_recoveries: u64,
    pub transport_failures: u64,
    pub documents_returned: u64,
}

impl MetricsSnapshot {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
