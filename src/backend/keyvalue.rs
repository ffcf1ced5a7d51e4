//! Key-value document backend
//!
//! Implements `DocBackend` over any `TableClient`. The client is injected at
//! construction and owned until `into_client`.
//!
//! # Execution Flow (save)
//!
//! 1. Read `_id` from the document
//! 2. Normalize floats to exact decimals
//! 3. `put_item` on the configured table
//! 4. A missing table maps to `Resource`; other store errors pass through

use crate::config::BackendConfig;
use crate::document::{Document, DocumentModel};
use crate::observability::{
    log_event_with_fields, Event, Logger, MetricsRegistry, ObservationScope,
};
use crate::query::QueryResolver;
use crate::store::{PrimaryKey, StoreError, TableClient};

use super::contract::{DocBackend, DocStream};
use super::errors::{BackendError, BackendResult};
use super::materialize::materialize;
use super::normalize::normalize_document;
use super::scan::TableScan;

/// Document backend over a schemaless key-value table
pub struct KeyValueBackend<C: TableClient> {
    client: C,
    config: BackendConfig,
    metrics: MetricsRegistry,
}

impl<C: TableClient> KeyValueBackend<C> {
    /// Validate `config` and take ownership of `client`.
    ///
    /// Sets the process-wide log level from `config.log_level`, replacing
    /// whatever an earlier backend set.
    pub fn new(client: C, config: BackendConfig) -> BackendResult<Self> {
        config.validate()?;
        Logger::set_min_severity(config.log_severity());

        log_event_with_fields(
            Event::BackendOpen,
            &[
                ("index_suffix", config.index_suffix.as_str()),
                ("table", config.table.as_str()),
            ],
        );

        Ok(Self {
            client,
            config,
            metrics: MetricsRegistry::new(),
        })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Release the store client
    pub fn into_client(self) -> C {
        log_event_with_fields(Event::BackendClose, &[("table", self.config.table.as_str())]);
        self.client
    }

    /// Raw paged scan of the whole table
    pub fn scan(&self) -> TableScan<'_, C> {
        TableScan::new(
            &self.client,
            &self.config.table,
            &self.metrics,
            self.config.scan_page_size,
        )
    }

    fn resolver(&self) -> QueryResolver<'_, C> {
        QueryResolver::new(&self.client, &self.config, &self.metrics)
    }

    fn table(&self) -> &str {
        &self.config.table
    }

    fn store_failure(&self, err: StoreError) -> BackendError {
        self.metrics.increment_errors();
        BackendError::Store(err)
    }

    /// Delete every scanned item. Stops at the first failure.
    fn flush_items(&self) -> BackendResult<usize> {
        let mut deleted = 0;
        for doc in self.scan() {
            let doc = doc?;
            let id = doc.id().ok_or(BackendError::MissingId)?;
            self.client
                .delete_item(self.table(), &PrimaryKey::new(id))
                .map_err(|e| self.store_failure(e))?;
            deleted += 1;
            self.metrics.add_flushed_items(1);
        }
        Ok(deleted)
    }
}

impl<C: TableClient> DocBackend for KeyValueBackend<C> {
    fn save<'d, M: DocumentModel>(&self, doc: &'d M) -> BackendResult<&'d M> {
        let document = doc.to_document();
        let id = document.id().ok_or(BackendError::MissingId)?.to_string();
        let item = normalize_document(&document)?.into_fields();

        match self.client.put_item(self.table(), item) {
            Ok(()) => {
                self.metrics.increment_saves();
                log_event_with_fields(
                    Event::ItemSaved,
                    &[("id", id.as_str()), ("table", self.table())],
                );
                Ok(doc)
            }
            Err(e) if e.is_resource_not_found() => {
                self.metrics.increment_errors();
                log_event_with_fields(
                    Event::ResourceMissing,
                    &[("id", id.as_str()), ("table", self.table())],
                );
                Err(BackendError::Resource(format!(
                    "table '{}' does not exist",
                    self.table()
                )))
            }
            Err(e) => Err(self.store_failure(e)),
        }
    }

    fn delete<M: DocumentModel>(&self, doc: &M) -> BackendResult<()> {
        let document = doc.to_document();
        let id = document.id().ok_or(BackendError::MissingId)?;

        self.client
            .delete_item(self.table(), &PrimaryKey::new(id))
            .map_err(|e| self.store_failure(e))?;

        self.metrics.increment_deletes();
        log_event_with_fields(Event::ItemDeleted, &[("id", id), ("table", self.table())]);
        Ok(())
    }

    fn get<M: DocumentModel>(&self, doc_id: &str) -> BackendResult<M> {
        let key = PrimaryKey::new(M::doc_id(doc_id));
        self.metrics.increment_gets();

        let item = self
            .client
            .get_item(self.table(), &key)
            .map_err(|e| self.store_failure(e))?;

        match item {
            Some(item) => {
                log_event_with_fields(
                    Event::ItemFetched,
                    &[("id", key.as_str()), ("table", self.table())],
                );
                materialize(Document::from(item))
            }
            None => {
                self.metrics.increment_get_misses();
                log_event_with_fields(
                    Event::ItemMissing,
                    &[("id", key.as_str()), ("table", self.table())],
                );
                Err(BackendError::NotFound(key.as_str().to_string()))
            }
        }
    }

    fn all<'a, M: DocumentModel + 'a>(&'a self) -> BackendResult<DocStream<'a, M>> {
        Ok(Box::new(
            self.scan().map(|doc| doc.and_then(materialize::<M>)),
        ))
    }

    fn flush_db(&self) -> BackendResult<usize> {
        let scope = ObservationScope::with_fields("FLUSH", &[("table", self.table())]);

        match self.flush_items() {
            Ok(deleted) => {
                scope.complete_with_fields(&[("deleted", deleted.to_string().as_str())]);
                Ok(deleted)
            }
            Err(e) => {
                scope.fail(&e.to_string());
                Err(e)
            }
        }
    }

    fn get_doc_list<S: AsRef<str>>(&self, filters: &[S]) -> BackendResult<Vec<Document>> {
        self.resolver().get_doc_list(filters)
    }
}
