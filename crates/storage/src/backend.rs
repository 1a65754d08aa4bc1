//! Unified pattern store with enum dispatch.

use async_trait::async_trait;
use patterning_core::{RawVoicingJoin, StoreConfig};

use crate::error::StorageError;
use crate::pg_storage::PgPatternStore;
use crate::rest_storage::RestPatternStore;
use crate::traits::PatternStore;

macro_rules! dispatch {
    ($self:expr, $method:ident ( $($arg:expr),* $(,)? )) => {
        match $self {
            StoreBackend::Postgres(s) => s.$method($($arg),*).await,
            StoreBackend::Rest(s) => s.$method($($arg),*).await,
        }
    };
}

#[derive(Debug)]
pub enum StoreBackend {
    Postgres(PgPatternStore),
    Rest(RestPatternStore),
}

impl StoreBackend {
    /// Connect the backend selected by configuration.
    pub async fn connect(config: &StoreConfig, timeout_secs: u64) -> Result<Self, StorageError> {
        match config {
            StoreConfig::Postgres { database_url } => {
                Ok(Self::Postgres(PgPatternStore::new(database_url).await?))
            },
            StoreConfig::Rest { base_url, api_key } => {
                let store = RestPatternStore::new(base_url, api_key.clone(), timeout_secs)?;
                tracing::info!(base_url = store.base_url(), "using REST pattern store");
                Ok(Self::Rest(store))
            },
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Rest(_) => "rest",
        }
    }
}

#[async_trait]
impl PatternStore for StoreBackend {
    async fn fetch_recent_voicings(
        &self,
        limit: usize,
    ) -> Result<Vec<RawVoicingJoin>, StorageError> {
        dispatch!(self, fetch_recent_voicings(limit))
    }

    async fn delete_voicing(&self, id: &str) -> Result<(), StorageError> {
        dispatch!(self, delete_voicing(id))
    }
}
