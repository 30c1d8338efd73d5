//! Error types for storage access and catalog operations.
//!
//! Two layers are distinguished:
//!
//! - [`StorageError`] describes a failure of the key-value slot itself
//!   (LMDB, filesystem, encoding, quota).
//! - [`CatalogError`] is what catalog and cart operations return. A storage
//!   failure during a mutation surfaces as [`CatalogError::Storage`] after the
//!   in-memory change has been rolled back.
//!
//! Looking up or mutating an unknown product id is not an error: those
//! operations return `Ok(None)`.

use std::string::FromUtf8Error;

use thiserror::Error;

/// Failures raised by a [`KeyValueStorage`](crate::storage::KeyValueStorage) backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The LMDB environment or transaction reported an error.
    #[error("LMDB error: {0}")]
    Lmdb(#[from] lmdb::Error),

    /// Creating or accessing the database directory failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value was not valid UTF-8.
    #[error("Stored value is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),

    /// Writing the value would exceed the backend's size limit.
    #[error("Quota exceeded writing '{key}': {requested} bytes requested, limit is {limit}")]
    QuotaExceeded {
        key: String,
        requested: usize,
        limit: usize,
    },
}

/// Errors returned by [`CatalogStore`](crate::catalog_state::CatalogStore) and
/// [`Cart`](crate::cart_state::Cart) operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A draft or patch failed validation. `field` is the JSON field name.
    #[error("Invalid '{field}': {reason}")]
    Validation { field: &'static str, reason: String },

    /// Persisting the collection failed; the in-memory state was restored.
    #[error("Failed to persist catalog: {0}")]
    Storage(#[from] StorageError),

    /// The highest id in use is `u64::MAX`, so no larger id exists.
    #[error("No product id left above {highest}")]
    IdSpaceExhausted { highest: u64 },

    /// Encoding or decoding JSON failed.
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CatalogError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        CatalogError::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Returns the offending field name for validation errors.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            CatalogError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
