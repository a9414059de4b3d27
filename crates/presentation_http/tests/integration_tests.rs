//! Integration tests for the ingest HTTP API, driven end-to-end through
//! `axum-test` against the in-memory adapters.
//!
//! Chat and message creation only allocate a number and enqueue persistence;
//! tests that immediately read the created resource back must drain the Job
//! Queue through a `WorkerService` first, exactly as the real worker pool
//! would before a client's next request happens to observe it.
#![allow(clippy::expect_used)]

use std::sync::Arc;

use application::services::WorkerService;
use application::ports::{CounterStore, JobQueue, LogStore, SearchIndex};
use axum_test::TestServer;
use infrastructure::{AppConfig, InMemoryCounterStore, InMemoryJobQueue, InMemoryLogStore, InMemorySearchIndex};
use presentation_http::{create_router, state::AppState};
use serde_json::json;

struct Harness {
    server: TestServer,
    worker: WorkerService,
}

impl Harness {
    fn new() -> Self {
        let log_store: Arc<dyn LogStore> = Arc::new(InMemoryLogStore::new());
        let counters: Arc<dyn CounterStore> = Arc::new(InMemoryCounterStore::new());
        let queue: Arc<dyn JobQueue> = Arc::new(InMemoryJobQueue::new());
        let search: Arc<dyn SearchIndex> = Arc::new(InMemorySearchIndex::new());

        let worker = WorkerService::new(
            Arc::clone(&log_store),
            Arc::clone(&queue),
            Arc::clone(&search),
            Arc::clone(&counters),
        );
        let state = AppState::new(log_store, counters, queue, search, Arc::new(AppConfig::default()));
        let server = TestServer::new(create_router(state)).expect("failed to create test server");

        Self { server, worker }
    }

    /// Run the worker until the queue is empty. Persisting a message
    /// enqueues follow-up recount/index jobs, so this may take several
    /// rounds; bail out rather than loop forever if something is stuck.
    async fn drain(&self) {
        for _ in 0..10 {
            if self.worker.run_once(50).await.expect("worker run_once failed") == 0 {
                return;
            }
        }
        panic!("job queue did not drain within the round budget");
    }
}

async fn create_application(harness: &Harness, name: &str) -> serde_json::Value {
    let response = harness
        .server
        .post("/api/v1/chat_applications")
        .json(&json!({ "chat_application": { "name": name } }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json()
}

async fn create_chat(harness: &Harness, token: &str) -> serde_json::Value {
    let response = harness
        .server
        .post(&format!("/api/v1/chat_applications/{token}/chats"))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    harness.drain().await;
    response.json()
}

async fn create_message(harness: &Harness, token: &str, chat_number: u64, body: &str) -> serde_json::Value {
    let response = harness
        .server
        .post(&format!("/api/v1/chat_applications/{token}/chats/{chat_number}/messages"))
        .json(&json!({ "message": { "body": body } }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    harness.drain().await;
    response.json()
}

// ============ Health ============

#[tokio::test]
async fn health_endpoint_reports_healthy_in_memory_stack() {
    let harness = Harness::new();

    let response = harness.server.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["log_store"]["healthy"], true);
    assert_eq!(body["services"]["counter_store"]["healthy"], true);
    assert_eq!(body["services"]["search_index"]["healthy"], true);
}

// ============ Applications ============

#[tokio::test]
async fn create_application_returns_token_and_zero_chats_count() {
    let harness = Harness::new();

    let body = create_application(&harness, "Acme Corp").await;

    assert_eq!(body["name"], "Acme Corp");
    assert_eq!(body["chats_count"], 0);
    assert!(body["token"].is_string());
    assert!(!body["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn create_application_rejects_blank_name_with_422_envelope() {
    let harness = Harness::new();

    let response = harness
        .server
        .post("/api/v1/chat_applications")
        .json(&json!({ "chat_application": { "name": "" } }))
        .await;

    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["errors"]["name"][0], "can't be blank");
}

#[tokio::test]
async fn list_applications_includes_created_application() {
    let harness = Harness::new();
    create_application(&harness, "First").await;
    create_application(&harness, "Second").await;

    let response = harness.server.get("/api/v1/chat_applications").await;

    response.assert_status_ok();
    let body: Vec<serde_json::Value> = response.json();
    assert_eq!(body.len(), 2);
}

#[tokio::test]
async fn get_application_by_token_round_trips() {
    let harness = Harness::new();
    let created = create_application(&harness, "Acme Corp").await;
    let token = created["token"].as_str().unwrap();

    let response = harness.server.get(&format!("/api/v1/chat_applications/{token}")).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["name"], "Acme Corp");
}

#[tokio::test]
async fn get_application_unknown_token_returns_404() {
    let harness = Harness::new();

    let response = harness.server.get("/api/v1/chat_applications/does-not-exist").await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn update_application_renames() {
    let harness = Harness::new();
    let created = create_application(&harness, "Old Name").await;
    let token = created["token"].as_str().unwrap();

    let response = harness
        .server
        .patch(&format!("/api/v1/chat_applications/{token}"))
        .json(&json!({ "chat_application": { "name": "New Name" } }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["name"], "New Name");
}

#[tokio::test]
async fn update_application_rejects_blank_name() {
    let harness = Harness::new();
    let created = create_application(&harness, "Old Name").await;
    let token = created["token"].as_str().unwrap();

    let response = harness
        .server
        .patch(&format!("/api/v1/chat_applications/{token}"))
        .json(&json!({ "chat_application": { "name": "" } }))
        .await;

    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
}

// ============ Chats ============

#[tokio::test]
async fn create_chat_starts_at_number_one_with_zero_messages() {
    let harness = Harness::new();
    let app = create_application(&harness, "Acme Corp").await;
    let token = app["token"].as_str().unwrap();

    let body = create_chat(&harness, token).await;

    assert_eq!(body["number"], 1);
    assert_eq!(body["messages_count"], 0);
}

#[tokio::test]
async fn create_chat_unknown_application_returns_404() {
    let harness = Harness::new();

    let response = harness.server.post("/api/v1/chat_applications/nope/chats").await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn chat_numbers_increment_per_application() {
    let harness = Harness::new();
    let app = create_application(&harness, "Acme Corp").await;
    let token = app["token"].as_str().unwrap();

    let first = create_chat(&harness, token).await;
    let second = create_chat(&harness, token).await;

    assert_eq!(first["number"], 1);
    assert_eq!(second["number"], 2);
}

#[tokio::test]
async fn get_chat_zero_returns_404_without_panicking() {
    let harness = Harness::new();
    let app = create_application(&harness, "Acme Corp").await;
    let token = app["token"].as_str().unwrap();

    let response = harness.server.get(&format!("/api/v1/chat_applications/{token}/chats/0")).await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn list_chats_for_application() {
    let harness = Harness::new();
    let app = create_application(&harness, "Acme Corp").await;
    let token = app["token"].as_str().unwrap();
    create_chat(&harness, token).await;
    create_chat(&harness, token).await;

    let response = harness.server.get(&format!("/api/v1/chat_applications/{token}/chats")).await;

    response.assert_status_ok();
    let body: Vec<serde_json::Value> = response.json();
    assert_eq!(body.len(), 2);
}

#[tokio::test]
async fn twenty_concurrent_chat_creations_yield_distinct_sequential_numbers() {
    let harness = Arc::new(Harness::new());
    let app = create_application(&harness, "Acme Corp").await;
    let token = app["token"].as_str().unwrap().to_string();

    let mut handles = Vec::new();
    for _ in 0..20 {
        let harness = Arc::clone(&harness);
        let token = token.clone();
        handles.push(tokio::spawn(async move {
            let response = harness
                .server
                .post(&format!("/api/v1/chat_applications/{token}/chats"))
                .await;
            response.assert_status(axum::http::StatusCode::CREATED);
            let body: serde_json::Value = response.json();
            body["number"].as_u64().unwrap()
        }));
    }

    let mut numbers: Vec<u64> = Vec::new();
    for handle in handles {
        numbers.push(handle.await.expect("task panicked"));
    }
    numbers.sort_unstable();

    assert_eq!(numbers, (1..=20).collect::<Vec<_>>());
}

// ============ Messages ============

#[tokio::test]
async fn create_message_returns_sequential_number() {
    let harness = Harness::new();
    let app = create_application(&harness, "Acme Corp").await;
    let token = app["token"].as_str().unwrap();
    create_chat(&harness, token).await;

    let body = create_message(&harness, token, 1, "hello there").await;

    assert_eq!(body["number"], 1);
}

#[tokio::test]
async fn create_message_rejects_blank_body_with_422_envelope() {
    let harness = Harness::new();
    let app = create_application(&harness, "Acme Corp").await;
    let token = app["token"].as_str().unwrap();
    create_chat(&harness, token).await;

    let response = harness
        .server
        .post(&format!("/api/v1/chat_applications/{token}/chats/1/messages"))
        .json(&json!({ "message": { "body": "   " } }))
        .await;

    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["errors"]["body"][0], "can't be blank");
}

#[tokio::test]
async fn create_message_unknown_chat_returns_404() {
    let harness = Harness::new();
    let app = create_application(&harness, "Acme Corp").await;
    let token = app["token"].as_str().unwrap();

    let response = harness
        .server
        .post(&format!("/api/v1/chat_applications/{token}/chats/1/messages"))
        .json(&json!({ "message": { "body": "hello" } }))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn list_messages_for_chat() {
    let harness = Harness::new();
    let app = create_application(&harness, "Acme Corp").await;
    let token = app["token"].as_str().unwrap();
    create_chat(&harness, token).await;
    create_message(&harness, token, 1, "first").await;
    create_message(&harness, token, 1, "second").await;

    let response = harness.server.get(&format!("/api/v1/chat_applications/{token}/chats/1/messages")).await;

    response.assert_status_ok();
    let body: Vec<serde_json::Value> = response.json();
    assert_eq!(body.len(), 2);
    assert_eq!(body[0]["body"], "first");
    assert_eq!(body[1]["body"], "second");
}

#[tokio::test]
async fn get_message_by_number_round_trips() {
    let harness = Harness::new();
    let app = create_application(&harness, "Acme Corp").await;
    let token = app["token"].as_str().unwrap();
    create_chat(&harness, token).await;
    create_message(&harness, token, 1, "hello there").await;

    let response = harness.server.get(&format!("/api/v1/chat_applications/{token}/chats/1/messages/1")).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["body"], "hello there");
}

#[tokio::test]
async fn get_message_zero_returns_404_without_panicking() {
    let harness = Harness::new();
    let app = create_application(&harness, "Acme Corp").await;
    let token = app["token"].as_str().unwrap();
    create_chat(&harness, token).await;

    let response = harness.server.get(&format!("/api/v1/chat_applications/{token}/chats/1/messages/0")).await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn search_messages_finds_case_insensitive_substring() {
    let harness = Harness::new();
    let app = create_application(&harness, "Acme Corp").await;
    let token = app["token"].as_str().unwrap();
    create_chat(&harness, token).await;
    create_message(&harness, token, 1, "The quick Brown Fox").await;
    create_message(&harness, token, 1, "Totally unrelated").await;

    let response = harness
        .server
        .get(&format!("/api/v1/chat_applications/{token}/chats/1/messages/search?q=brown"))
        .await;

    response.assert_status_ok();
    let body: Vec<serde_json::Value> = response.json();
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["body"], "The quick Brown Fox");
}

#[tokio::test]
async fn search_messages_rejects_blank_query() {
    let harness = Harness::new();
    let app = create_application(&harness, "Acme Corp").await;
    let token = app["token"].as_str().unwrap();
    create_chat(&harness, token).await;

    let response = harness
        .server
        .get(&format!("/api/v1/chat_applications/{token}/chats/1/messages/search?q="))
        .await;

    response.assert_status_bad_request();
}

// ============ Routing ============

#[tokio::test]
async fn unknown_route_returns_404() {
    let harness = Harness::new();

    let response = harness.server.get("/unknown/path").await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn swagger_ui_is_mounted() {
    let harness = Harness::new();

    let response = harness.server.get("/api-docs/openapi.json").await;

    response.assert_status_ok();
}
