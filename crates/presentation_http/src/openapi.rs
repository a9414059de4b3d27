//! OpenAPI documentation for the ingest HTTP API.

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::applications::{
    ApplicationAttributes, ApplicationResponse, CreateApplicationRequest, UpdateApplicationRequest,
};
use crate::handlers::chats::ChatResponse;
use crate::handlers::health::{HealthResponse, ServiceHealth};
use crate::handlers::messages::{CreateMessageRequest, MessageAttributes, MessageResponse};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(),
    components(schemas(
        ApplicationResponse,
        ApplicationAttributes,
        CreateApplicationRequest,
        UpdateApplicationRequest,
        ChatResponse,
        MessageResponse,
        MessageAttributes,
        CreateMessageRequest,
        HealthResponse,
        ServiceHealth,
    )),
    tags(
        (name = "chat_applications", description = "Tenant applications"),
        (name = "chats", description = "Chats within an application"),
        (name = "messages", description = "Messages within a chat, with search"),
        (name = "health", description = "Liveness and dependency reachability"),
    ),
    info(
        title = "Chat Ingest API",
        description = "Multi-tenant chat ingestion and search service",
        version = "1.0.0",
    )
)]
pub struct ApiDoc;

/// Mount the Swagger UI at `/docs`, serving the spec above.
pub fn create_openapi_routes() -> Router<AppState> {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
