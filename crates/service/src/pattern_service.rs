use std::sync::Arc;

use patterning_core::{PatternRecord, RECENT_PATTERN_LIMIT, flatten_voicings};
use patterning_storage::PatternStore;

use crate::error::ServiceError;

/// Reads and deletes pattern records against the remote store.
pub struct PatternService {
    store: Arc<dyn PatternStore>,
}

impl PatternService {
    #[must_use]
    pub fn new(store: Arc<dyn PatternStore>) -> Self {
        Self { store }
    }

    /// The most recent patterns, newest first, flattened for display.
    pub async fn fetch_recent(&self) -> Result<Vec<PatternRecord>, ServiceError> {
        match self.store.fetch_recent_voicings(RECENT_PATTERN_LIMIT).await {
            Ok(rows) => Ok(flatten_voicings(rows)),
            Err(e) => {
                tracing::error!(error = %e, "error fetching patterns");
                Err(ServiceError::Fetch(e))
            },
        }
    }

    /// Issue exactly one remote delete for `id`. No existence pre-check.
    pub async fn delete_by_id(&self, id: &str) -> Result<(), ServiceError> {
        self.store.delete_voicing(id).await.map_err(|source| {
            tracing::error!(id, error = %source, "error deleting voicing");
            ServiceError::Delete { id: id.to_owned(), source }
        })
    }
}
