//! HTTP API server for patterning-admin.
//!
//! The access code is checked here, on the server, rather than in the
//! browser. Each successful unlock opens a `DashboardSession` kept in memory
//! and addressed by the `x-session-id` header; nothing survives a restart.
//! Sessions expire after an idle period, and the map is capped by evicting
//! the least recently used session.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(unreachable_pub, reason = "pub items are re-exported")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::shadow_reuse, reason = "Shadowing for Arc clones is idiomatic")]

pub mod api_error;
mod api_types;
mod handlers;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    Json, Router,
    http::{HeaderMap, HeaderName, Method, header},
    routing::{delete, get, post},
};
use patterning_core::{DEFAULT_SESSION_IDLE_SECS, MAX_DASHBOARD_SESSIONS};
use patterning_service::{DashboardSession, PatternService};
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::{Any, CorsLayer};

use crate::api_error::ApiError;
pub use api_types::{PatternView, PatternsResponse, VersionResponse};

pub const SESSION_HEADER: &str = "x-session-id";

pub type SharedSession = Arc<Mutex<DashboardSession>>;

struct SessionEntry {
    session: SharedSession,
    last_used: Instant,
}

/// Shared application state for all HTTP handlers.
pub struct AppState {
    /// Configured access code.
    pub secret: Arc<str>,
    pub patterns: Arc<PatternService>,
    /// Base of outbound viewer links; empty for site-relative links.
    pub viewer_base_url: String,
    session_idle_ttl: Duration,
    max_sessions: usize,
    /// Unlocked sessions by id. Each session serializes its own store calls.
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl AppState {
    pub fn new(
        secret: impl Into<Arc<str>>,
        patterns: Arc<PatternService>,
        viewer_base_url: String,
    ) -> Self {
        Self {
            secret: secret.into(),
            patterns,
            viewer_base_url,
            session_idle_ttl: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
            max_sessions: MAX_DASHBOARD_SESSIONS,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn with_session_limits(mut self, idle_ttl: Duration, max_sessions: usize) -> Self {
        self.session_idle_ttl = idle_ttl;
        self.max_sessions = max_sessions.max(1);
        self
    }

    /// The unlocked session named by the request headers.
    ///
    /// Touches the session so it stays alive while in use.
    pub async fn session(&self, headers: &HeaderMap) -> Result<SharedSession, ApiError> {
        let session_id = headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing session".to_owned()))?;

        let mut sessions = self.sessions.write().await;
        let Some(entry) = sessions.get_mut(session_id) else {
            return Err(ApiError::Unauthorized("unknown or expired session".to_owned()));
        };
        if entry.last_used.elapsed() > self.session_idle_ttl {
            sessions.remove(session_id);
            tracing::info!(session_id, "dashboard session expired");
            return Err(ApiError::Unauthorized("unknown or expired session".to_owned()));
        }
        entry.last_used = Instant::now();
        Ok(Arc::clone(&entry.session))
    }

    /// Register an unlocked session and return its id.
    ///
    /// Sweeps idle sessions first, then evicts the least recently used ones
    /// while the map is full.
    pub async fn open_session(&self, session: DashboardSession) -> String {
        let mut sessions = self.sessions.write().await;
        let ttl = self.session_idle_ttl;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_used.elapsed() <= ttl);
        let expired = before - sessions.len();
        if expired > 0 {
            tracing::info!(expired, "swept idle dashboard sessions");
        }

        while sessions.len() >= self.max_sessions {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(id, _)| id.clone())
            else {
                break;
            };
            sessions.remove(&oldest);
            tracing::info!(session_id = %oldest, "evicted least recently used dashboard session");
        }

        let session_id = uuid::Uuid::new_v4().to_string();
        sessions.insert(
            session_id.clone(),
            SessionEntry { session: Arc::new(Mutex::new(session)), last_used: Instant::now() },
        );
        session_id
    }

    /// Forget a session, returning it if it was open.
    pub async fn close_session(&self, session_id: &str) -> Option<SharedSession> {
        self.sessions.write().await.remove(session_id).map(|entry| entry.session)
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(SESSION_HEADER)]);

    Router::new()
        .route("/health", get(health))
        .route("/api/version", get(version))
        .route("/api/unlock", post(handlers::session::unlock))
        .route("/api/lock", post(handlers::session::lock))
        .route("/api/patterns", get(handlers::patterns::list_patterns))
        .route("/api/patterns/refresh", post(handlers::patterns::refresh_patterns))
        .route("/api/patterns/{id}", delete(handlers::patterns::delete_pattern))
        .layer(cors)
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse { version: env!("CARGO_PKG_VERSION") })
}
