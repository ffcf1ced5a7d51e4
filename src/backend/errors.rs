//! # Backend Errors
//!
//! The conditions a document backend surfaces to the calling layer.
//! Store failures other than a missing table on write pass through as
//! `Store` unchanged.

use thiserror::Error;

use crate::config::ConfigError;
use crate::document::DocumentError;
use crate::store::StoreError;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Document backend errors
#[derive(Debug, Error)]
pub enum BackendError {
    /// Primary-key lookup found no item
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Backing table does not exist
    #[error("Backing store resource is absent: {0}")]
    Resource(String),

    /// Filter descriptor has fewer than five segments
    #[error("Malformed filter '{descriptor}': expected at least 5 segments, got {segments}")]
    MalformedFilter { descriptor: String, segments: usize },

    /// Intersection over zero filters is undefined
    #[error("Filter list is empty")]
    EmptyFilterList,

    /// Document to save or delete carries no string `_id`
    #[error("Document has no '_id' field")]
    MissingId,

    /// Value cannot be expressed as an exact decimal
    #[error("Cannot normalize field '{field}': {reason}")]
    Normalize { field: String, reason: String },

    /// Document factory rejected a stored mapping
    #[error("Materialization failed: {0}")]
    Materialize(#[from] DocumentError),

    /// Invalid backend configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Store transport failure, passed through unchanged
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BackendError {
    /// Returns the error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            BackendError::NotFound(_) => "DOCKV_DOC_NOT_FOUND",
            BackendError::Resource(_) => "DOCKV_RESOURCE_ABSENT",
            BackendError::MalformedFilter { .. } => "DOCKV_MALFORMED_FILTER",
            BackendError::EmptyFilterList => "DOCKV_EMPTY_FILTER_LIST",
            BackendError::MissingId => "DOCKV_MISSING_ID",
            BackendError::Normalize { .. } => "DOCKV_NORMALIZE_FAILED",
            BackendError::Materialize(_) => "DOCKV_MATERIALIZE_FAILED",
            BackendError::Config(_) => "DOCKV_CONFIG_INVALID",
            BackendError::Store(_) => "DOCKV_STORE_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::NotFound(_))
    }

    pub fn is_resource(&self) -> bool {
        matches!(self, BackendError::Resource(_))
    }

    /// Whether this error was rejected before any store request was issued
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            BackendError::MalformedFilter { .. }
                | BackendError::EmptyFilterList
                | BackendError::MissingId
                | BackendError::Normalize { .. }
        )
    }
}
