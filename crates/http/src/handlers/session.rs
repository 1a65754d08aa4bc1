use axum::{Json, extract::State, http::HeaderMap, http::StatusCode};
use std::sync::Arc;

use patterning_core::AccessGate;
use patterning_service::DashboardSession;

use crate::api_error::ApiError;
use crate::api_types::{PatternsResponse, UnlockRequest, UnlockResponse};
use crate::{AppState, SESSION_HEADER};

/// Check the access code server-side and open a dashboard session.
pub async fn unlock(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UnlockRequest>,
) -> Result<Json<UnlockResponse>, ApiError> {
    let mut session =
        DashboardSession::new(AccessGate::new(Arc::clone(&state.secret)), state.patterns.clone());
    session.unlock(&req.password).await?;

    let dashboard = PatternsResponse::from_state(session.state(), &state.viewer_base_url);
    let session_id = state.open_session(session).await;
    tracing::info!(session_id = %session_id, "dashboard session opened");

    Ok(Json(UnlockResponse { session_id, dashboard }))
}

/// Lock and forget the caller's session.
pub async fn lock(State(state): State<Arc<AppState>>, headers: HeaderMap) -> StatusCode {
    let Some(session_id) = headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok()) else {
        return StatusCode::NO_CONTENT;
    };
    if let Some(session) = state.close_session(session_id).await {
        session.lock().await.lock();
        tracing::info!(session_id, "dashboard session closed");
    }
    StatusCode::NO_CONTENT
}
