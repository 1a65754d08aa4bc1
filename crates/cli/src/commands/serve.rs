use anyhow::Result;
use patterning_core::{
    DEFAULT_SESSION_IDLE_SECS, ENV_SESSION_IDLE_SECS, MAX_DASHBOARD_SESSIONS,
    env_parse_with_default,
};
use patterning_http::{AppState, create_router};
use std::sync::Arc;
use std::time::Duration;

use crate::{connect_patterns, load_config};

pub(crate) async fn run(port: u16, host: String) -> Result<()> {
    let config = load_config()?;
    let patterns = connect_patterns(&config).await?;
    let idle_secs = env_parse_with_default(ENV_SESSION_IDLE_SECS, DEFAULT_SESSION_IDLE_SECS);
    let state = Arc::new(
        AppState::new(config.admin_password.as_str(), patterns, config.viewer_base_url.clone())
            .with_session_limits(Duration::from_secs(idle_secs), MAX_DASHBOARD_SESSIONS),
    );

    let router = create_router(state);
    let addr = format!("{host}:{port}");
    tracing::info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
