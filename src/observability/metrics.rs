//! Metrics registry for the document backend
//!
//! - Counters only
//! - Monotonic increase
//! - Thread-safe, Relaxed ordering

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for one backend instance
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    saves: AtomicU64,
    gets: AtomicU64,
    get_misses: AtomicU64,
    deletes: AtomicU64,
    scans: AtomicU64,
    scan_pages: AtomicU64,
    queries: AtomicU64,
    index_lookups: AtomicU64,
    queries_rejected: AtomicU64,
    flushed_items: AtomicU64,
    errors: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_saves(&self) {
        self.saves.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_gets(&self) {
        self.gets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_get_misses(&self) {
        self.get_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_deletes(&self) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
    }

    /// One full scan started
    pub fn increment_scans(&self) {
        self.scans.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_scan_pages(&self) {
        self.scan_pages.fetch_add(1, Ordering::Relaxed);
    }

    /// One filter list resolved
    pub fn increment_queries(&self) {
        self.queries.fetch_add(1, Ordering::Relaxed);
    }

    /// One index (or primary-key) query page issued
    pub fn increment_index_lookups(&self) {
        self.index_lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_rejected(&self) {
        self.queries_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_flushed_items(&self, count: u64) {
        self.flushed_items.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_errors(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Serialize the current counters as a JSON object
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            saves: self.saves.load(Ordering::Relaxed),
            gets: self.gets.load(Ordering::Relaxed),
            get_misses: self.get_misses.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            scans: self.scans.load(Ordering::Relaxed),
            scan_pages: self.scan_pages.load(Ordering::Relaxed),
            queries: self.queries.load(Ordering::Relaxed),
            index_lookups: self.index_lookups.load(Ordering::Relaxed),
            queries_rejected: self.queries_rejected.load(Ordering::Relaxed),
            flushed_items: self.flushed_items.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub saves: u64,
    pub gets: u64,
    pub get_misses: u64,
    pub deletes: u64,
    pub scans: u64,
    pub scan_pages: u64,
    pub queries: u64,
    pub index_lookups: u64,
    pub queries_rejected: u64,
    pub flushed_items: u64,
    pub errors: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_has_zero_values() {
        let registry = MetricsRegistry::new();
        assert_eq!(registry.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_increment_counters() {
        let registry = MetricsRegistry::new();

        registry.increment_saves();
        registry.increment_saves();
        registry.increment_gets();
        registry.increment_get_misses();
        registry.increment_deletes();
        registry.increment_scans();
        registry.increment_scan_pages();
        registry.increment_queries();
        registry.increment_index_lookups();
        registry.increment_queries_rejected();
        registry.add_flushed_items(5);
        registry.increment_errors();

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.saves, 2);
        assert_eq!(snapshot.gets, 1);
        assert_eq!(snapshot.get_misses, 1);
        assert_eq!(snapshot.deletes, 1);
        assert_eq!(snapshot.scans, 1);
        assert_eq!(snapshot.scan_pages, 1);
        assert_eq!(snapshot.queries, 1);
        assert_eq!(snapshot.index_lookups, 1);
        assert_eq!(snapshot.queries_rejected, 1);
        assert_eq!(snapshot.flushed_items, 5);
        assert_eq!(snapshot.errors, 1);
    }

    #[test]
    fn test_to_json() {
        let registry = MetricsRegistry::new();
        registry.add_flushed_items(12);
        registry.increment_queries();

        let parsed: serde_json::Value = serde_json::from_str(&registry.to_json()).unwrap();
        assert_eq!(parsed["flushed_items"], 12);
        assert_eq!(parsed["queries"], 1);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(MetricsRegistry::new());
        let mut handles = vec![];

        for _ in 0..10 {
            let reg = Arc::clone(&registry);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    reg.increment_saves();
                    reg.increment_index_lookups();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.saves, 1000);
        assert_eq!(snapshot.index_lookups, 1000);
    }
}
