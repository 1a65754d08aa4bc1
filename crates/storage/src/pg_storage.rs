//! PostgreSQL pattern store using sqlx.
//!
//! The nested join is assembled server-side with `json_agg`, so one round
//! trip returns the same shape a PostgREST embed would.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use patterning_core::{
    PG_POOL_ACQUIRE_TIMEOUT_SECS, PG_POOL_IDLE_TIMEOUT_SECS, PG_POOL_MAX_CONNECTIONS,
    RawEssence, RawLayer, RawVoicingJoin,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use crate::error::StorageError;
use crate::traits::PatternStore;

/// Voicings newest first, each with its layer and a JSON array of essences,
/// each essence carrying a JSON array of its images.
const RECENT_VOICINGS_SQL: &str = r"
SELECT
    v.id::text AS id,
    v.content,
    v.created_at,
    l.word AS layer_word,
    COALESCE(
        (SELECT json_agg(json_build_object(
                    'content', e.content,
                    'images', COALESCE(
                        (SELECT json_agg(json_build_object('image_url', i.image_url))
                         FROM images i WHERE i.essence_id = e.id),
                        '[]'::json)))
         FROM essences e WHERE e.voicing_id = v.id),
        '[]'::json) AS essences
FROM voicings v
LEFT JOIN layers l ON l.id = v.layer_id
ORDER BY v.created_at DESC
LIMIT $1
";

const DELETE_VOICING_SQL: &str = "DELETE FROM voicings WHERE id::text = $1";

#[derive(Clone, Debug)]
pub struct PgPatternStore {
    pool: PgPool,
}

impl PgPatternStore {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(PG_POOL_MAX_CONNECTIONS)
            .acquire_timeout(std::time::Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(std::time::Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;
        tracing::info!("PgPatternStore initialized");
        Ok(Self { pool })
    }

    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn row_to_voicing(row: &sqlx::postgres::PgRow) -> Result<RawVoicingJoin, StorageError> {
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let content: Option<String> = row.try_get("content")?;
    let layer_word: Option<String> = row.try_get("layer_word")?;
    let essences: serde_json::Value = row.try_get("essences")?;
    let essences: Vec<RawEssence> =
        serde_json::from_value(essences).map_err(|e| StorageError::DataCorruption {
            context: "essences aggregate".to_owned(),
            source: Box::new(e),
        })?;

    Ok(RawVoicingJoin {
        id: row.try_get("id")?,
        content: content.unwrap_or_default(),
        created_at: created_at.to_rfc3339(),
        layer: layer_word.map(|word| RawLayer { word }),
        essences,
    })
}

#[async_trait]
impl PatternStore for PgPatternStore {
    async fn fetch_recent_voicings(
        &self,
        limit: usize,
    ) -> Result<Vec<RawVoicingJoin>, StorageError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query(RECENT_VOICINGS_SQL).bind(limit).fetch_all(&self.pool).await?;
        let voicings = rows.iter().map(row_to_voicing).collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(count = voicings.len(), "fetched recent voicings from postgres");
        Ok(voicings)
    }

    async fn delete_voicing(&self, id: &str) -> Result<(), StorageError> {
        let result = sqlx::query(DELETE_VOICING_SQL).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound { entity: "voicing", id: id.to_owned() });
        }
        tracing::info!(id, "deleted voicing from postgres");
        Ok(())
    }
}
