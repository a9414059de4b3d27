//! Route definitions

use axum::{
    Router,
    routing::{get, post},
};

use crate::{handlers, openapi::create_openapi_routes, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/api/v1/chat_applications",
            post(handlers::applications::create_application).get(handlers::applications::list_applications),
        )
        .route(
            "/api/v1/chat_applications/{token}",
            get(handlers::applications::get_application).patch(handlers::applications::update_application),
        )
        .route(
            "/api/v1/chat_applications/{token}/chats",
            post(handlers::chats::create_chat).get(handlers::chats::list_chats),
        )
        .route(
            "/api/v1/chat_applications/{token}/chats/{number}",
            get(handlers::chats::get_chat),
        )
        .route(
            "/api/v1/chat_applications/{token}/chats/{number}/messages",
            post(handlers::messages::create_message).get(handlers::messages::list_messages),
        )
        .route(
            "/api/v1/chat_applications/{token}/chats/{number}/messages/search",
            get(handlers::messages::search_messages),
        )
        .route(
            "/api/v1/chat_applications/{token}/chats/{number}/messages/{message_number}",
            get(handlers::messages::get_message),
        )
        // OpenAPI documentation
        .merge(create_openapi_routes())
        // Attach state
        .with_state(state)
}
