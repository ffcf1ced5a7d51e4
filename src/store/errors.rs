//! # Store Errors
//!
//! Transport-level failures reported by the key-value store. The backend
//! translates only `ResourceNotFound` on writes; everything else passes
//! through untouched.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors reported by a `TableClient`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// Target table does not exist
    #[error("Requested resource not found: table '{table}'")]
    ResourceNotFound { table: String },

    /// Malformed request (bad key, unknown index, unsupported attribute type)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Request rate exceeded
    #[error("Request throttled: {0}")]
    Throttled(String),

    /// Caller lacks permission
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Any other service-side failure
    #[error("Service error: {0}")]
    Service(String),
}

impl StoreError {
    /// Returns the store error code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::ResourceNotFound { .. } => "ResourceNotFoundException",
            StoreError::Validation(_) => "ValidationException",
            StoreError::Throttled(_) => "ThrottlingException",
            StoreError::AccessDenied(_) => "AccessDeniedException",
            StoreError::Service(_) => "InternalServerError",
        }
    }

    /// Create a resource-not-found error for a table
    pub fn resource_not_found(table: impl Into<String>) -> Self {
        StoreError::ResourceNotFound {
            table: table.into(),
        }
    }

    pub fn is_resource_not_found(&self) -> bool {
        matches!(self, StoreError::ResourceNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_not_found_display() {
        let err = StoreError::resource_not_found("people");
        assert!(err.is_resource_not_found());
        assert_eq!(err.code(), "ResourceNotFoundException");
        assert!(err.to_string().contains("people"));
    }

    #[test]
    fn test_other_errors_are_not_resource() {
        assert!(!StoreError::Throttled("slow down".into()).is_resource_not_found());
    }
}
