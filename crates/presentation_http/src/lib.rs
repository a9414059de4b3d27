//! HTTP presentation layer for the chat ingest service
//!
//! Thin axum handlers translating wire requests into `IngestService` calls
//! and back, plus `/health` and the OpenAPI/Swagger UI documentation.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use middleware::{RequestId, RequestIdLayer, SecurityHeadersLayer};
pub use openapi::{ApiDoc, create_openapi_routes};
pub use routes::create_router;
pub use state::AppState;
