//! In-memory pattern store for tests of the layers above storage.

use std::collections::VecDeque;

use async_trait::async_trait;
use patterning_core::RawVoicingJoin;
use tokio::sync::Mutex;

use crate::error::StorageError;
use crate::traits::PatternStore;

#[derive(Debug, Default)]
struct Inner {
    /// Newest first, like the remote ordering.
    rows: Vec<RawVoicingJoin>,
    fetch_failures: VecDeque<String>,
    delete_failures: VecDeque<String>,
    fetch_calls: usize,
    delete_calls: usize,
}

/// Holds rows newest first and can be told to fail upcoming calls.
#[derive(Debug, Default)]
pub struct MemoryPatternStore {
    inner: Mutex<Inner>,
}

impl MemoryPatternStore {
    pub fn new(rows: Vec<RawVoicingJoin>) -> Self {
        Self { inner: Mutex::new(Inner { rows, ..Inner::default() }) }
    }

    /// Insert a row as the newest voicing.
    pub async fn push_newest(&self, row: RawVoicingJoin) {
        self.inner.lock().await.rows.insert(0, row);
    }

    /// The next fetch fails with a 503 carrying `message`.
    pub async fn fail_next_fetch(&self, message: &str) {
        self.inner.lock().await.fetch_failures.push_back(message.to_owned());
    }

    /// The next delete fails with a 503 carrying `message`.
    pub async fn fail_next_delete(&self, message: &str) {
        self.inner.lock().await.delete_failures.push_back(message.to_owned());
    }

    pub async fn ids(&self) -> Vec<String> {
        self.inner.lock().await.rows.iter().map(|r| r.id.clone()).collect()
    }

    pub async fn fetch_calls(&self) -> usize {
        self.inner.lock().await.fetch_calls
    }

    pub async fn delete_calls(&self) -> usize {
        self.inner.lock().await.delete_calls
    }
}

#[async_trait]
impl PatternStore for MemoryPatternStore {
    async fn fetch_recent_voicings(
        &self,
        limit: usize,
    ) -> Result<Vec<RawVoicingJoin>, StorageError> {
        let mut inner = self.inner.lock().await;
        inner.fetch_calls += 1;
        if let Some(message) = inner.fetch_failures.pop_front() {
            return Err(StorageError::HttpStatus { code: 503, message });
        }
        Ok(inner.rows.iter().take(limit).cloned().collect())
    }

    async fn delete_voicing(&self, id: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().await;
        inner.delete_calls += 1;
        if let Some(message) = inner.delete_failures.pop_front() {
            return Err(StorageError::HttpStatus { code: 503, message });
        }
        let before = inner.rows.len();
        inner.rows.retain(|r| r.id != id);
        if inner.rows.len() == before {
            return Err(StorageError::NotFound { entity: "voicing", id: id.to_owned() });
        }
        Ok(())
    }
}
