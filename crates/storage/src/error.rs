//! Typed error enum for the storage layer.
//!
//! Lets callers match on specific failure modes (not found, HTTP status,
//! transient DB errors) instead of downcasting opaque boxes.

use thiserror::Error;

/// Storage-layer error with variants covering every expected failure mode.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The targeted row does not exist (nothing was deleted).
    #[error("not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// SQL / connection / timeout failure.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    /// Transport failure talking to the REST endpoint.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// REST endpoint answered with a non-success status.
    #[error("store returned HTTP {code}: {message}")]
    HttpStatus { code: u16, message: String },

    /// Row data could not be deserialized into the join shape.
    #[error("data corruption: {context}")]
    DataCorruption {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// HTTP client could not be constructed.
    #[error("client initialization failed: {0}")]
    ClientInit(String),
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// `RowNotFound` maps to `NotFound`; everything else is a `Database` error.
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound { entity: "row", id: "unknown".into() },
            other => Self::Database(other),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::DataCorruption {
            context: "JSON deserialization of voicing join".to_owned(),
            source: Box::new(err),
        }
    }
}
