//! PostgREST pattern store using reqwest.
//!
//! Talks to a PostgREST-compatible endpoint (such as a hosted Supabase
//! project) with resource embedding for the nested join.

use async_trait::async_trait;
use patterning_core::RawVoicingJoin;
use serde::Deserialize;

use crate::error::StorageError;
use crate::traits::PatternStore;

/// Embedded select: layer word, essences and their images.
pub const VOICING_SELECT: &str =
    "id,content,created_at,layer:layers(word),essences(content,images(image_url))";

const VOICINGS_PATH: &str = "/rest/v1/voicings";

/// Error payload PostgREST returns on failures.
#[derive(Deserialize)]
struct PostgrestError {
    message: String,
}

pub struct RestPatternStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for RestPatternStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestPatternStore")
            .field("client", &self.client)
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .finish()
    }
}

impl RestPatternStore {
    /// Creates a REST store for the given endpoint.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(base_url: &str, api_key: String, timeout_secs: u64) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| StorageError::ClientInit(e.to_string()))?;
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_owned(), api_key })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn voicings_url(&self) -> String {
        format!("{}{VOICINGS_PATH}", self.base_url)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
    }
}

/// Turns a non-success response into `HttpStatus`, preferring the
/// PostgREST `message` field over the raw body.
async fn status_error(response: reqwest::Response) -> StorageError {
    let code = response.status().as_u16();
    let body = response.text().await.unwrap_or_else(|_| "could not read error body".to_owned());
    let message = serde_json::from_str::<PostgrestError>(&body).map_or(body, |e| e.message);
    StorageError::HttpStatus { code, message }
}

#[async_trait]
impl PatternStore for RestPatternStore {
    async fn fetch_recent_voicings(
        &self,
        limit: usize,
    ) -> Result<Vec<RawVoicingJoin>, StorageError> {
        let limit = limit.to_string();
        let response = self
            .authorized(self.client.get(self.voicings_url()))
            .query(&[
                ("select", VOICING_SELECT),
                ("order", "created_at.desc"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let body = response.text().await?;
        let voicings: Vec<RawVoicingJoin> = serde_json::from_str(&body)?;
        tracing::debug!(count = voicings.len(), "fetched recent voicings from REST store");
        Ok(voicings)
    }

    async fn delete_voicing(&self, id: &str) -> Result<(), StorageError> {
        let filter = format!("eq.{id}");
        let response = self
            .authorized(self.client.delete(self.voicings_url()))
            .header("Prefer", "return=representation")
            .query(&[("id", filter.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let body = response.text().await?;
        let deleted: Vec<serde_json::Value> = serde_json::from_str(&body)?;
        if deleted.is_empty() {
            return Err(StorageError::NotFound { entity: "voicing", id: id.to_owned() });
        }
        tracing::info!(id, "deleted voicing via REST store");
        Ok(())
    }
}
