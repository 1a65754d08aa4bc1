#![allow(clippy::unwrap_used, reason = "test code")]

use std::sync::Arc;
use std::time::Duration;

use patterning_core::{
    DEFAULT_SESSION_IDLE_SECS, MAX_DASHBOARD_SESSIONS, RawEssence, RawImage, RawLayer,
    RawVoicingJoin,
};
use patterning_http::{AppState, SESSION_HEADER, create_router};
use patterning_service::PatternService;
use patterning_storage::MemoryPatternStore;
use serde_json::Value;

fn raw(id: &str, word: Option<&str>) -> RawVoicingJoin {
    RawVoicingJoin {
        id: id.to_owned(),
        content: format!("voicing {id}"),
        created_at: "2024-01-01T00:00:00Z".to_owned(),
        layer: word.map(|w| RawLayer { word: w.to_owned() }),
        essences: vec![RawEssence {
            content: "flowing calm".to_owned(),
            images: vec![RawImage { image_url: "http://x/img.png".to_owned() }],
        }],
    }
}

struct TestServer {
    base: String,
    store: Arc<MemoryPatternStore>,
    state: Arc<AppState>,
    client: reqwest::Client,
}

impl TestServer {
    async fn start(rows: Vec<RawVoicingJoin>) -> Self {
        Self::start_with_limits(
            rows,
            Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
            MAX_DASHBOARD_SESSIONS,
        )
        .await
    }

    async fn start_with_limits(
        rows: Vec<RawVoicingJoin>,
        idle_ttl: Duration,
        max_sessions: usize,
    ) -> Self {
        let store = Arc::new(MemoryPatternStore::new(rows));
        let service = Arc::new(PatternService::new(store.clone()));
        let state = Arc::new(
            AppState::new("abc", service, "https://viewer.example.com".to_owned())
                .with_session_limits(idle_ttl, max_sessions),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = create_router(Arc::clone(&state));
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Self { base: format!("http://{addr}"), store, state, client: reqwest::Client::new() }
    }

    async fn list(&self, session: &str) -> reqwest::Response {
        self.client
            .get(format!("{}/api/patterns", self.base))
            .header(SESSION_HEADER, session)
            .send()
            .await
            .unwrap()
    }

    async fn unlock(&self, password: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/api/unlock", self.base))
            .json(&serde_json::json!({ "password": password }))
            .send()
            .await
            .unwrap()
    }

    async fn session_id(&self) -> String {
        let body: Value = self.unlock("abc").await.json().await.unwrap();
        body["session_id"].as_str().unwrap().to_owned()
    }
}

#[tokio::test]
async fn test_health() {
    let server = TestServer::start(Vec::new()).await;
    let body = server.client.get(format!("{}/health", server.base)).send().await.unwrap();
    assert_eq!(body.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_wrong_password_is_rejected_without_fetch() {
    let server = TestServer::start(vec![raw("v1", None)]).await;
    let response = server.unlock("abd").await;
    assert_eq!(response.status(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "incorrect password");
    assert_eq!(server.store.fetch_calls().await, 0);
}

#[tokio::test]
async fn test_unlock_returns_flattened_patterns_with_viewer_links() {
    let server = TestServer::start(vec![raw("v2", Some("river")), raw("v1", None)]).await;
    let response = server.unlock("abc").await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert!(body["session_id"].as_str().is_some());
    assert_eq!(body["empty"], false);
    let patterns = body["patterns"].as_array().unwrap();
    assert_eq!(patterns.len(), 2);
    assert_eq!(patterns[0]["id"], "v2");
    assert_eq!(patterns[0]["word"], "river");
    assert_eq!(patterns[0]["essence"], "flowing calm");
    assert_eq!(patterns[0]["viewer_url"], "https://viewer.example.com/v/v2");
    assert_eq!(patterns[1]["word"], "Unknown");
}

#[tokio::test]
async fn test_patterns_require_session() {
    let server = TestServer::start(vec![raw("v1", None)]).await;
    let missing = server.client.get(format!("{}/api/patterns", server.base)).send().await.unwrap();
    assert_eq!(missing.status(), 401);

    let unknown = server
        .client
        .get(format!("{}/api/patterns", server.base))
        .header(SESSION_HEADER, "not-a-session")
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status(), 401);
}

#[tokio::test]
async fn test_empty_store_reports_empty_state() {
    let server = TestServer::start(Vec::new()).await;
    let session = server.session_id().await;
    let body: Value = server
        .client
        .get(format!("{}/api/patterns", server.base))
        .header(SESSION_HEADER, &session)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["empty"], true);
    assert!(body.get("fetching").is_none());
}

#[tokio::test]
async fn test_delete_requires_confirmation() {
    let server = TestServer::start(vec![raw("v1", None)]).await;
    let session = server.session_id().await;
    let response = server
        .client
        .delete(format!("{}/api/patterns/v1", server.base))
        .header(SESSION_HEADER, &session)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    assert_eq!(server.store.delete_calls().await, 0);
}

#[tokio::test]
async fn test_confirmed_delete_removes_pattern() {
    let server = TestServer::start(vec![raw("v2", None), raw("v1", None)]).await;
    let session = server.session_id().await;
    let response = server
        .client
        .delete(format!("{}/api/patterns/v2?confirm=true", server.base))
        .header(SESSION_HEADER, &session)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    let body: Value = server
        .client
        .get(format!("{}/api/patterns", server.base))
        .header(SESSION_HEADER, &session)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let ids: Vec<&str> =
        body["patterns"].as_array().unwrap().iter().map(|p| p["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["v1"]);
}

#[tokio::test]
async fn test_failed_delete_keeps_pattern_and_reports_store_message() {
    let server = TestServer::start(vec![raw("v1", None)]).await;
    let session = server.session_id().await;
    server.store.fail_next_delete("permission denied").await;

    let response = server
        .client
        .delete(format!("{}/api/patterns/v1?confirm=true", server.base))
        .header(SESSION_HEADER, &session)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 502);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("permission denied"));
    assert_eq!(server.store.ids().await, vec!["v1"]);
}

#[tokio::test]
async fn test_delete_of_missing_voicing_is_not_found() {
    let server = TestServer::start(vec![raw("v1", None)]).await;
    let session = server.session_id().await;
    let response = server
        .client
        .delete(format!("{}/api/patterns/ghost?confirm=true", server.base))
        .header(SESSION_HEADER, &session)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_list() {
    let server = TestServer::start(vec![raw("v1", None)]).await;
    let session = server.session_id().await;
    server.store.push_newest(raw("v2", None)).await;
    server.store.fail_next_fetch("timeout").await;

    let response = server
        .client
        .post(format!("{}/api/patterns/refresh", server.base))
        .header(SESSION_HEADER, &session)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 502);

    let body: Value = server
        .client
        .get(format!("{}/api/patterns", server.base))
        .header(SESSION_HEADER, &session)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["patterns"].as_array().unwrap().len(), 1);
    assert!(body["last_error"].as_str().unwrap().contains("timeout"));

    let refreshed: Value = server
        .client
        .post(format!("{}/api/patterns/refresh", server.base))
        .header(SESSION_HEADER, &session)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(refreshed["patterns"][0]["id"], "v2");
}

#[tokio::test]
async fn test_lock_ends_session() {
    let server = TestServer::start(vec![raw("v1", None)]).await;
    let session = server.session_id().await;
    let response = server
        .client
        .post(format!("{}/api/lock", server.base))
        .header(SESSION_HEADER, &session)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    let after = server
        .client
        .get(format!("{}/api/patterns", server.base))
        .header(SESSION_HEADER, &session)
        .send()
        .await
        .unwrap();
    assert_eq!(after.status(), 401);
}

#[tokio::test]
async fn test_idle_session_expires() {
    let server =
        TestServer::start_with_limits(vec![raw("v1", None)], Duration::from_millis(50), 8).await;
    let session = server.session_id().await;
    assert_eq!(server.list(&session).await.status(), 200);

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(server.list(&session).await.status(), 401);
    assert_eq!(server.state.session_count().await, 0);
}

#[tokio::test]
async fn test_unlock_sweeps_idle_sessions() {
    let server =
        TestServer::start_with_limits(vec![raw("v1", None)], Duration::from_millis(50), 8).await;
    for _ in 0..5 {
        server.session_id().await;
    }
    assert_eq!(server.state.session_count().await, 5);

    tokio::time::sleep(Duration::from_millis(150)).await;
    server.session_id().await;
    assert_eq!(server.state.session_count().await, 1);
}

#[tokio::test]
async fn test_session_cap_evicts_least_recently_used() {
    let server =
        TestServer::start_with_limits(vec![raw("v1", None)], Duration::from_secs(600), 2).await;
    let first = server.session_id().await;
    let second = server.session_id().await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    assert_eq!(server.list(&first).await.status(), 200);

    let third = server.session_id().await;
    assert_eq!(server.state.session_count().await, 2);
    assert_eq!(server.list(&second).await.status(), 401);
    assert_eq!(server.list(&first).await.status(), 200);
    assert_eq!(server.list(&third).await.status(), 200);
}
