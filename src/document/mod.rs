//! Document model shared by the backend and the store
//!
//! - `Value`: scalar field values, including the in-process-only `Float`
//! - `Document`: flat field mapping keyed by `_id`
//! - `DocumentModel`: the factory capability the calling layer implements

#[allow(clippy::module_inception)]
mod document;
mod errors;
mod model;
mod value;

pub use document::{Document, ID_FIELD};
pub use errors::{DocumentError, DocumentResult};
pub use model::DocumentModel;
pub use value::Value;
