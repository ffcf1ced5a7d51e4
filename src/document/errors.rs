//! # Document Errors
//!
//! Failures converting between raw mappings and document objects.

use thiserror::Error;

/// Result type for document conversions
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Document conversion errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DocumentError {
    /// Input was not a JSON object
    #[error("Document must be an object, got {0}")]
    NotAnObject(&'static str),

    /// Nested arrays and objects are not scalar fields
    #[error("Field '{field}' holds unsupported {kind} value")]
    UnsupportedValue { field: String, kind: &'static str },

    /// A field the model requires is absent
    #[error("Missing field: {0}")]
    MissingField(String),

    /// A field is present but of the wrong type
    #[error("Field '{field}' expected {expected}, got {actual}")]
    InvalidField {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl DocumentError {
    /// Returns the error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            DocumentError::NotAnObject(_) => "DOCKV_DOCUMENT_NOT_OBJECT",
            DocumentError::UnsupportedValue { .. } => "DOCKV_DOCUMENT_UNSUPPORTED_VALUE",
            DocumentError::MissingField(_) => "DOCKV_DOCUMENT_MISSING_FIELD",
            DocumentError::InvalidField { .. } => "DOCKV_DOCUMENT_INVALID_FIELD",
        }
    }
}
