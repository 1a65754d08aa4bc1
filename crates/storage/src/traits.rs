//! Pattern store abstraction.
//!
//! The dashboard depends only on this query/mutation shape, never on a
//! concrete transport.

use async_trait::async_trait;
use patterning_core::RawVoicingJoin;

use crate::error::StorageError;

#[async_trait]
pub trait PatternStore: Send + Sync {
    /// Most recent voicings, newest first, each joined with its layer word
    /// and its essences (with their images). At most `limit` rows.
    async fn fetch_recent_voicings(&self, limit: usize)
    -> Result<Vec<RawVoicingJoin>, StorageError>;

    /// Delete one voicing row by id.
    ///
    /// Returns `StorageError::NotFound` when no row matched.
    async fn delete_voicing(&self, id: &str) -> Result<(), StorageError>;
}
