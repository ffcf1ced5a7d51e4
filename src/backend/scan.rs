//! Lazy full-table scan
//!
//! Pages are fetched on demand. The scan ends when the store returns a page
//! without a continuation key. A page error is yielded once, then the
//! iterator is exhausted.

use std::collections::VecDeque;

use crate::document::Document;
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};
use crate::store::{Item, PrimaryKey, ScanRequest, TableClient};

use super::errors::{BackendError, BackendResult};

/// Iterator over every raw document in a table
pub struct TableScan<'a, C: TableClient + ?Sized> {
    client: &'a C,
    table: &'a str,
    metrics: &'a MetricsRegistry,
    page_size: Option<usize>,
    buffered: VecDeque<Item>,
    next_key: Option<PrimaryKey>,
    pages: usize,
    finished: bool,
}

impl<'a, C: TableClient + ?Sized> TableScan<'a, C> {
    pub(crate) fn new(
        client: &'a C,
        table: &'a str,
        metrics: &'a MetricsRegistry,
        page_size: Option<usize>,
    ) -> Self {
        metrics.increment_scans();
        Self {
            client,
            table,
            metrics,
            page_size,
            buffered: VecDeque::new(),
            next_key: None,
            pages: 0,
            finished: false,
        }
    }

    /// Pages fetched so far
    pub fn pages_read(&self) -> usize {
        self.pages
    }

    fn fetch_page(&mut self) -> BackendResult<()> {
        let request = ScanRequest {
            limit: self.page_size,
            exclusive_start_key: self.next_key.take(),
        };
        let page = self.client.scan(self.table, &request)?;

        self.pages += 1;
        self.metrics.increment_scan_pages();
        log_event_with_fields(
            Event::ScanPage,
            &[
                ("items", page.items.len().to_string().as_str()),
                ("page", self.pages.to_string().as_str()),
                ("table", self.table),
            ],
        );

        self.buffered.extend(page.items);
        match page.last_evaluated_key {
            Some(key) => self.next_key = Some(key),
            None => {
                self.finished = true;
                log_event_with_fields(
                    Event::ScanComplete,
                    &[
                        ("pages", self.pages.to_string().as_str()),
                        ("table", self.table),
                    ],
                );
            }
        }
        Ok(())
    }
}

impl<C: TableClient + ?Sized> Iterator for TableScan<'_, C> {
    type Item = BackendResult<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffered.pop_front() {
                return Some(Ok(Document::from(item)));
            }
            if self.finished {
                return None;
            }
            if let Err(e) = self.fetch_page() {
                self.finished = true;
                self.metrics.increment_errors();
                return Some(Err(e));
            }
        }
    }
}

/// Collect an entire scan, failing on the first page error
pub fn collect_scan<C: TableClient + ?Sized>(scan: TableScan<'_, C>) -> BackendResult<Vec<Document>> {
    scan.collect::<Result<Vec<_>, BackendError>>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, TableSchema};

    fn store_with(n: usize) -> MemoryStore {
        let store = MemoryStore::new();
        store.create_table(TableSchema::new("t")).unwrap();
        for i in 0..n {
            let doc = Document::with_id(format!("doc{:02}", i)).field("n", i as i64);
            store.put_item("t", doc.into_fields()).unwrap();
        }
        store
    }

    #[test]
    fn test_scan_is_lazy() {
        let store = store_with(5);
        let metrics = MetricsRegistry::new();
        let mut scan = TableScan::new(&store, "t", &metrics, Some(2));
        assert_eq!(scan.pages_read(), 0);

        scan.next().unwrap().unwrap();
        assert_eq!(scan.pages_read(), 1);
    }

    #[test]
    fn test_scan_reads_every_page() {
        let store = store_with(5);
        let metrics = MetricsRegistry::new();
        let docs = collect_scan(TableScan::new(&store, "t", &metrics, Some(2))).unwrap();

        assert_eq!(docs.len(), 5);
        assert_eq!(metrics.snapshot().scan_pages, 3);
        assert_eq!(metrics.snapshot().scans, 1);
    }

    #[test]
    fn test_empty_table() {
        let store = store_with(0);
        let metrics = MetricsRegistry::new();
        let mut scan = TableScan::new(&store, "t", &metrics, None);
        assert!(scan.next().is_none());
        assert_eq!(scan.pages_read(), 1);
    }

    #[test]
    fn test_error_yielded_once() {
        let store = MemoryStore::new();
        let metrics = MetricsRegistry::new();
        let mut scan = TableScan::new(&store, "missing", &metrics, None);

        assert!(matches!(scan.next(), Some(Err(BackendError::Store(_)))));
        assert!(scan.next().is_none());
        assert_eq!(metrics.snapshot().errors, 1);
    }
}
