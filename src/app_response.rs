use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeError;

use crate::error::{CatalogError, StorageError};

/// Envelope returned by every C ABI function, serialized as
/// `{"Ok": "<json payload>"}`, `{"NotFound": "<message>"}` and so on.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub enum AppResponse {
    DatabaseError(String),
    SerializationError(String),
    NotFound(String),
    ValidationError(String),
    BadRequest(String),
    Ok(String),
}

impl Display for AppResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AppResponse::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppResponse::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            AppResponse::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppResponse::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppResponse::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppResponse::Ok(msg) => write!(f, "Ok: {}", msg),
        }
    }
}

impl From<StorageError> for AppResponse {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Lmdb(lmdb::Error::MapFull) => {
                AppResponse::DatabaseError("Database is full (map size exceeded)".to_string())
            }
            StorageError::Lmdb(lmdb::Error::Corrupted) => {
                AppResponse::DatabaseError("Database is corrupted".to_string())
            }
            other => AppResponse::DatabaseError(other.to_string()),
        }
    }
}

impl From<SerdeError> for AppResponse {
    fn from(err: SerdeError) -> Self {
        AppResponse::SerializationError(format!("JSON serialization error: {}", err))
    }
}

impl From<CatalogError> for AppResponse {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation { .. } => AppResponse::ValidationError(err.to_string()),
            CatalogError::IdSpaceExhausted { .. } => AppResponse::DatabaseError(err.to_string()),
            CatalogError::Storage(e) => AppResponse::from(e),
            CatalogError::Serialization(e) => AppResponse::from(e),
        }
    }
}

impl AppResponse {
    /// Wraps `value` as a JSON payload in [`AppResponse::Ok`].
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(json) => AppResponse::Ok(json),
            Err(e) => AppResponse::from(e),
        }
    }
}
