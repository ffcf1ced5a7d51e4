//! Result materialization
//!
//! Raw stored mappings become document objects through the caller's
//! `DocumentModel` factory. Conversion is lazy: each mapping is converted
//! only when the iterator reaches it.

use std::marker::PhantomData;

use crate::document::{Document, DocumentModel};

use super::errors::BackendResult;

/// Build one document object from a raw mapping
pub fn materialize<M: DocumentModel>(doc: Document) -> BackendResult<M> {
    Ok(M::from_document(doc)?)
}

/// Lazy sequence of document objects over already-resolved mappings
pub struct Materialized<M> {
    docs: std::vec::IntoIter<Document>,
    _model: PhantomData<fn() -> M>,
}

impl<M: DocumentModel> Materialized<M> {
    pub fn new(docs: Vec<Document>) -> Self {
        Self {
            docs: docs.into_iter(),
            _model: PhantomData,
        }
    }
}

impl<M: DocumentModel> Iterator for Materialized<M> {
    type Item = BackendResult<M>;

    fn next(&mut self) -> Option<Self::Item> {
        self.docs.next().map(materialize)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.docs.size_hint()
    }
}

impl<M: DocumentModel> ExactSizeIterator for Materialized<M> {}
