//! `/health` — liveness plus per-dependency reachability.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub services: HashMap<String, ServiceHealth>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceHealth {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Probe the Durable Log Store, Counter Store, and Search Index with a
/// cheap read each, and report `healthy` only if every dependency answered.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let mut services = HashMap::new();

    services.insert(
        "log_store".to_string(),
        probe(state.log_store.list_applications().await.map(|_| ())),
    );
    services.insert(
        "counter_store".to_string(),
        probe(state.counters.get("health_check").await.map(|_| ())),
    );
    services.insert(
        "search_index".to_string(),
        probe(state.search.document_count().await.map(|_| ())),
    );

    let all_healthy = services.values().all(|s| s.healthy);
    let status = if all_healthy { "healthy" } else { "unhealthy" };

    (StatusCode::OK, Json(HealthResponse { status, services }))
}

fn probe<E: std::fmt::Display>(result: Result<(), E>) -> ServiceHealth {
    match result {
        Ok(()) => ServiceHealth { healthy: true, error: None },
        Err(e) => ServiceHealth { healthy: false, error: Some(e.to_string()) },
    }
}
