//! Uniform backend contract
//!
//! The calling document layer talks to every physical store through this
//! trait, so it stays agnostic to what sits underneath.

use crate::document::{Document, DocumentModel};

use super::errors::BackendResult;
use super::materialize::Materialized;

/// Lazy stream of materialized documents
pub type DocStream<'a, M> = Box<dyn Iterator<Item = BackendResult<M>> + 'a>;

/// CRUD and query operations of a document backend
pub trait DocBackend {
    /// Persist a document under its `_id`, returning the caller's handle
    fn save<'d, M: DocumentModel>(&self, doc: &'d M) -> BackendResult<&'d M>;

    /// Remove a document by its `_id`. Absent documents are not an error.
    fn delete<M: DocumentModel>(&self, doc: &M) -> BackendResult<()>;

    /// Fetch one document by primary key
    fn get<M: DocumentModel>(&self, doc_id: &str) -> BackendResult<M>;

    /// Every stored document, fetched page by page as the stream advances
    fn all<'a, M: DocumentModel + 'a>(&'a self) -> BackendResult<DocStream<'a, M>>;

    /// Delete every stored document, returning how many were deleted
    fn flush_db(&self) -> BackendResult<usize>;

    /// Raw documents matching every filter descriptor
    fn get_doc_list<S: AsRef<str>>(&self, filters: &[S]) -> BackendResult<Vec<Document>>;

    /// Documents matching every filter descriptor, materialized lazily
    fn evaluate<M: DocumentModel, S: AsRef<str>>(
        &self,
        filters: &[S],
    ) -> BackendResult<Materialized<M>> {
        Ok(Materialized::new(self.get_doc_list(filters)?))
    }
}
