//! Typed error enum for the service layer.
//!
//! Store failures are caught at the fetch/delete boundary and converted
//! here; nothing in this taxonomy is fatal to the process.

use patterning_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Wrong access code. The caller may retry.
    #[error("incorrect password")]
    GateRejected,

    /// Dashboard operation attempted on a locked session.
    #[error("dashboard is locked")]
    Locked,

    /// Delete requested without explicit confirmation.
    #[error("deletion requires explicit confirmation")]
    ConfirmationRequired,

    /// Reading recent patterns failed; the previously shown list is kept.
    #[error("error fetching patterns: {0}")]
    Fetch(#[source] StorageError),

    /// Deleting a voicing failed; it stays listed.
    #[error("error deleting {id}: {source}")]
    Delete {
        id: String,
        #[source]
        source: StorageError,
    },
}

impl ServiceError {
    /// Whether the store reported that the target did not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Delete { source, .. } if source.is_not_found())
    }
}
