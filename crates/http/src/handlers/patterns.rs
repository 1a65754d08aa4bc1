use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use std::sync::Arc;

use patterning_service::Confirmation;

use crate::AppState;
use crate::api_error::ApiError;
use crate::api_types::{DeleteQuery, PatternsResponse};

pub async fn list_patterns(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<PatternsResponse>, ApiError> {
    let session = state.session(&headers).await?;
    let session = session.lock().await;
    Ok(Json(PatternsResponse::from_state(session.state(), &state.viewer_base_url)))
}

pub async fn refresh_patterns(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<PatternsResponse>, ApiError> {
    let session = state.session(&headers).await?;
    let mut session = session.lock().await;
    session.refresh().await?;
    Ok(Json(PatternsResponse::from_state(session.state(), &state.viewer_base_url)))
}

pub async fn delete_pattern(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Result<StatusCode, ApiError> {
    let session = state.session(&headers).await?;
    let mut session = session.lock().await;
    session.delete(&id, Confirmation::from(query.confirm)).await?;
    Ok(StatusCode::NO_CONTENT)
}
