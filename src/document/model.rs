//! Document factory capability
//!
//! The backend never knows the concrete document-object type. It asks the
//! caller's type to build itself from a raw mapping and to expose its raw
//! mapping for writes.

use super::document::Document;
use super::errors::DocumentResult;

/// A type constructible from a mapping of field name to value
pub trait DocumentModel: Sized {
    /// Build an instance from a raw stored mapping
    fn from_document(doc: Document) -> DocumentResult<Self>;

    /// The raw mapping to persist. Must carry `_id`.
    fn to_document(&self) -> Document;

    /// Normalize a caller-supplied identifier into the store's key form
    fn doc_id(raw: &str) -> String {
        raw.to_string()
    }
}

impl DocumentModel for Document {
    fn from_document(doc: Document) -> DocumentResult<Self> {
        Ok(doc)
    }

    fn to_document(&self) -> Document {
        self.clone()
    }
}
