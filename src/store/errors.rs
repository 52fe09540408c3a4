//! Store error types.

use thiserror::Error;

use crate::model::EntityId;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures raised by a [`ServiceStore`](super::ServiceStore).
///
/// These never cross `MetadataIndex`; validators only ever see absence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No entity with the given key
    #[error("{kind} '{key}' not found")]
    NotFound { kind: &'static str, key: String },

    /// Underlying I/O failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Stored document could not be decoded
    #[error("malformed {kind} document {path}: {reason}")]
    Malformed {
        kind: &'static str,
        path: String,
        reason: String,
    },

    /// Store is temporarily unable to serve requests
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn not_found_id(kind: &'static str, id: EntityId) -> Self {
        StoreError::NotFound {
            kind,
            key: id.to_string(),
        }
    }

    pub fn not_found_name(kind: &'static str, name: &str) -> Self {
        StoreError::NotFound {
            kind,
            key: name.to_string(),
        }
    }

    /// Returns true for a plain "does not exist" outcome
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
