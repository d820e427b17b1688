//! Integration tests for the gateway HTTP surface.

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use leadline::api::ApiClient;
use leadline::gateway::{start_gateway, AppState, Gateway};
use leadline::session::SessionStore;
use leadline::tools::ToolRegistry;

/// Find a free port by binding to :0 and reading the assigned address.
async fn free_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

async fn start(backend_uri: &str, api_token: Option<String>) -> Gateway {
    let state = AppState {
        registry: Arc::new(ToolRegistry::with_builtins()),
        api: Arc::new(ApiClient::new(backend_uri, "test-internal-key")),
        sessions: SessionStore::default(),
        api_token,
    };
    start_gateway(free_addr().await, state).await.unwrap()
}

#[tokio::test]
async fn status_returns_ok() {
    let gw = start("http://localhost:1", None).await;

    let resp = reqwest::get(format!("http://{}/api/status", gw.addr))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    gw.handle.abort();
}

#[tokio::test]
async fn health_reports_tool_count() {
    let gw = start("http://localhost:1", None).await;

    let resp = reqwest::get(format!("http://{}/api/health", gw.addr))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["tools"], 16);
    assert_eq!(body["sessions"], 0);

    gw.handle.abort();
}

#[tokio::test]
async fn tools_endpoint_lists_catalogue() {
    let gw = start("http://localhost:1", None).await;

    let resp = reqwest::get(format!("http://{}/api/tools", gw.addr))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    let tools = body["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 16);
    assert!(tools
        .iter()
        .any(|t| t["name"] == "search_leads" && t["args_schema"]["type"] == "object"));

    gw.handle.abort();
}

/// A full conversation over HTTP: the first call mints a session id,
/// the second call reuses it and inherits the user identity.
#[tokio::test]
async fn call_threads_session_identity_across_requests() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/leads/list"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"leads": [{"id": "l1", "score": 82}]})),
        )
        .mount(&backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/leads/l1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "l1"})))
        .mount(&backend)
        .await;

    let gw = start(&backend.uri(), None).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://{}/api/tools/call", gw.addr))
        .json(&json!({"tool": "list_leads", "args": {"user_id": "u1"}}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();

    let session = body["session"].as_str().unwrap().to_string();
    assert!(!session.is_empty(), "a session id should be minted");
    let result: Value = serde_json::from_str(body["result"].as_str().unwrap()).unwrap();
    assert_eq!(result, json!({"leads": [{"id": "l1", "score": 82}]}));

    let resp = client
        .post(format!("http://{}/api/tools/call", gw.addr))
        .json(&json!({"tool": "get_lead", "args": {"lead_id": "l1"}, "session": session}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let requests = backend.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[1]
            .headers
            .get("X-User-Id")
            .map(|v| v.to_str().unwrap()),
        Some("u1"),
        "the second call should inherit the session's user identity"
    );

    gw.handle.abort();
}

#[tokio::test]
async fn validation_errors_map_to_400() {
    let gw = start("http://localhost:1", None).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://{}/api/tools/call", gw.addr))
        .json(&json!({"tool": "get_lead", "args": {}}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["kind"], "validation");

    gw.handle.abort();
}

#[tokio::test]
async fn upstream_errors_map_to_502_with_status() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/leads/l9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "not found"})))
        .mount(&backend)
        .await;

    let gw = start(&backend.uri(), None).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://{}/api/tools/call", gw.addr))
        .json(&json!({"tool": "get_lead", "args": {"lead_id": "l9"}}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["kind"], "upstream");
    assert_eq!(body["status"], 404);
    assert!(body["error"].as_str().unwrap().contains("not found"));

    gw.handle.abort();
}

#[tokio::test]
async fn api_token_gates_every_route() {
    let gw = start("http://localhost:1", Some("sekrit".into())).await;
    let client = reqwest::Client::new();

    // No token.
    let resp = client
        .get(format!("http://{}/api/tools", gw.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    // Wrong token.
    let resp = client
        .get(format!("http://{}/api/tools", gw.addr))
        .bearer_auth("nope")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    // Bearer header.
    let resp = client
        .get(format!("http://{}/api/tools", gw.addr))
        .bearer_auth("sekrit")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Query parameter.
    let resp = client
        .get(format!("http://{}/api/tools?token=sekrit", gw.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    gw.handle.abort();
}
