//! Request and response bodies.

use patterning_core::{PatternRecord, viewer_url};
use patterning_service::DashboardState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct UnlockRequest {
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Serialize)]
pub struct PatternView {
    #[serde(flatten)]
    pub record: PatternRecord,
    pub viewer_url: String,
}

#[derive(Debug, Serialize)]
pub struct PatternsResponse {
    pub patterns: Vec<PatternView>,
    /// No records to show. Requests on one session are serialized, so a
    /// response is never produced mid-fetch.
    pub empty: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl PatternsResponse {
    pub fn from_state(state: &DashboardState, viewer_base: &str) -> Self {
        let patterns = state
            .patterns
            .iter()
            .map(|record| PatternView {
                viewer_url: viewer_url(viewer_base, &record.id),
                record: record.clone(),
            })
            .collect();
        Self {
            patterns,
            empty: state.is_empty(),
            last_error: state.last_error.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UnlockResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub dashboard: PatternsResponse,
}

#[derive(Debug, Serialize)]
#[non_exhaustive]
pub struct VersionResponse {
    pub version: &'static str,
}
