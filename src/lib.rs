//! dockv - A document backend adapter for schemaless key-value stores
//!
//! Persists and queries documents against a store with a single primary key
//! (`_id`) and zero or more secondary indexes. Equality filters are resolved
//! independently per index and intersected.

pub mod backend;
pub mod config;
pub mod document;
pub mod observability;
pub mod query;
pub mod store;

pub use backend::{BackendError, BackendResult, DocBackend, KeyValueBackend};
pub use config::BackendConfig;
pub use document::{Document, DocumentModel, Value};
