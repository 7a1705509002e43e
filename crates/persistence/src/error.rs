//! Error types for the persistence layer.
//!
//! This module defines all error types used throughout the persistence layer,
//! following a hierarchy that separates lookup misses, malformed filters and
//! backend failures.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all storage operations.
///
/// This enum encompasses all possible errors that can occur during persistence
/// operations, organized by category.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Lookup misses
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Malformed filter trees
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl StorageError {
    /// Returns `true` when the error is a lookup miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::Resource(ResourceError::NotFound { .. }))
    }

    /// Shorthand for a miss on a known id.
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        StorageError::Resource(ResourceError::NotFound {
            collection: collection.into(),
            id: Some(id.into()),
        })
    }

    /// Shorthand for a miss on a filtered lookup.
    pub fn no_match(collection: impl Into<String>) -> Self {
        StorageError::Resource(ResourceError::NotFound {
            collection: collection.into(),
            id: None,
        })
    }
}

/// Errors related to item lookups.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The requested item does not exist in the collection.
    #[error("{}", not_found_message(.collection, .id.as_deref()))]
    NotFound {
        collection: String,
        id: Option<String>,
    },
}

fn not_found_message(collection: &str, id: Option<&str>) -> String {
    match id {
        Some(id) => format!("can't find {} with id: {}", collection, id),
        None => format!("can't find {} matching the given filters", collection),
    }
}

/// Errors caused by a filter tree the caller built incorrectly.
#[derive(Error, Debug)]
pub enum FilterError {
    /// A boolean operator (`$or`/`$and`) was given something other than a
    /// list of filters.
    #[error("invalid value for operator {operator:?}: {value}")]
    InvalidFilterValue { operator: String, value: String },

    /// The operator is not understood by the evaluating backend.
    #[error("unsupported filter operator: {operator}")]
    UnsupportedOperator { operator: String },

    /// A `$regex` operand could not be compiled.
    #[error("invalid pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Errors originating from the database backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// The per-call deadline expired before the backend answered.
    #[error("{backend_name} did not answer within {timeout_ms}ms")]
    Timeout {
        backend_name: String,
        timeout_ms: u64,
    },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

// Implement conversions from common error types

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Backend(BackendError::SerializationError {
            message: err.to_string(),
        })
    }
}

#[cfg(feature = "mongodb")]
impl From<mongodb::error::Error> for StorageError {
    fn from(err: mongodb::error::Error) -> Self {
        StorageError::Backend(BackendError::Internal {
            backend_name: "mongodb".to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        })
    }
}
