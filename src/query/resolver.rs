//! Query resolution
//!
//! Each filter is evaluated on its own against the index addressing its
//! field (`_id` goes to the primary key). Every filter yields a candidate set
//! of ids; the result is the intersection of all candidate sets (AND).
//!
//! # Execution Flow
//!
//! 1. Reject an empty filter list
//! 2. Deduplicate descriptors and extract `(index, value)` from each
//! 3. Query each filter, following continuation keys to the full answer set
//! 4. Record matched documents in one id -> document map
//! 5. Intersect candidate sets, smallest first
//! 6. Return the documents for the surviving ids, ascending by id

use std::collections::{BTreeMap, BTreeSet};

use crate::backend::{BackendError, BackendResult};
use crate::config::BackendConfig;
use crate::document::{Document, ID_FIELD};
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};
use crate::store::{KeyCondition, PrimaryKey, QueryRequest, TableClient};

use super::filter::{parse_filters, FilterDescriptor};

/// Ids matching one filter
pub type CandidateSet = BTreeSet<String>;

/// Resolves AND-combined equality filters against one table
pub struct QueryResolver<'a, C: TableClient + ?Sized> {
    client: &'a C,
    config: &'a BackendConfig,
    metrics: &'a MetricsRegistry,
}

impl<'a, C: TableClient + ?Sized> QueryResolver<'a, C> {
    pub fn new(client: &'a C, config: &'a BackendConfig, metrics: &'a MetricsRegistry) -> Self {
        Self {
            client,
            config,
            metrics,
        }
    }

    /// Resolve a filter list to the raw documents matching every filter.
    ///
    /// An empty list is rejected with `EmptyFilterList`. Malformed
    /// descriptors are rejected before any store request is issued.
    pub fn get_doc_list<S: AsRef<str>>(&self, filters: &[S]) -> BackendResult<Vec<Document>> {
        if filters.is_empty() {
            return Err(self.reject(BackendError::EmptyFilterList, ""));
        }

        let mut parsed = Vec::new();
        for descriptor in parse_filters(filters) {
            match FilterDescriptor::parse(&descriptor) {
                Ok(filter) => parsed.push(filter),
                Err(e) => return Err(self.reject(e, &descriptor)),
            }
        }

        self.metrics.increment_queries();

        let mut docs: BTreeMap<String, Document> = BTreeMap::new();
        let mut candidate_sets = Vec::with_capacity(parsed.len());
        for filter in &parsed {
            candidate_sets.push(self.candidates(filter, &mut docs)?);
        }

        let matched = intersect_candidates(candidate_sets).unwrap_or_default();
        let result: Vec<Document> = matched
            .iter()
            .filter_map(|id| docs.remove(id))
            .collect();

        log_event_with_fields(
            Event::QueryResolved,
            &[
                ("filters", parsed.len().to_string().as_str()),
                ("matched", result.len().to_string().as_str()),
                ("table", self.config.table.as_str()),
            ],
        );

        Ok(result)
    }

    /// Build the store request for one filter
    pub fn request_for(&self, filter: &FilterDescriptor) -> QueryRequest {
        let condition = KeyCondition::eq(filter.index(), filter.value());
        let mut request = if filter.index() == ID_FIELD {
            QueryRequest::primary(condition)
        } else {
            QueryRequest::index(self.config.index_name(filter.index()), condition)
        };
        request.limit = self.config.query_page_size;
        request
    }

    /// Evaluate one filter, paging until the store reports completion
    fn candidates(
        &self,
        filter: &FilterDescriptor,
        docs: &mut BTreeMap<String, Document>,
    ) -> BackendResult<CandidateSet> {
        let mut request = self.request_for(filter);
        let mut ids = CandidateSet::new();

        loop {
            self.metrics.increment_index_lookups();
            let page = self
                .client
                .query(&self.config.table, &request)
                .map_err(|e| {
                    self.metrics.increment_errors();
                    BackendError::from(e)
                })?;

            for item in page.items {
                if let Some(key) = PrimaryKey::of_item(&item) {
                    let id = key.as_str().to_string();
                    ids.insert(id.clone());
                    docs.insert(id, Document::from(item));
                }
            }

            match page.last_evaluated_key {
                Some(key) => request.exclusive_start_key = Some(key),
                None => break,
            }
        }

        let index_name = request.index_name.as_deref().unwrap_or(ID_FIELD);
        log_event_with_fields(
            Event::IndexQuery,
            &[
                ("index", index_name),
                ("matches", ids.len().to_string().as_str()),
                ("value", filter.value()),
            ],
        );

        Ok(ids)
    }

    fn reject(&self, err: BackendError, descriptor: &str) -> BackendError {
        self.metrics.increment_queries_rejected();
        log_event_with_fields(
            Event::QueryRejected,
            &[("filter", descriptor), ("reason", err.to_string().as_str())],
        );
        err
    }
}

/// Intersect candidate sets, smallest first.
///
/// Returns `None` for zero sets, where the intersection is undefined.
/// Stops early once the running intersection is empty.
pub fn intersect_candidates(mut sets: Vec<CandidateSet>) -> Option<CandidateSet> {
    sets.sort_by_key(BTreeSet::len);
    let mut remaining = sets.into_iter();
    let mut result = remaining.next()?;

    for set in remaining {
        if result.is_empty() {
            break;
        }
        result.retain(|id| set.contains(id));
    }

    Some(result)
}
