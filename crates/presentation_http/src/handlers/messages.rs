//! `/api/v1/chat_applications/:token/chats/:number/messages` handlers

use axum::extract::Query;
use axum::{Json, extract::Path, extract::State, http::StatusCode};
use domain::Message;
use domain::value_objects::Token;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::handlers::chats::parse_number;
use crate::{error::ApiError, state::AppState};

/// A message as it appears on the wire: addressed by its per-chat `number`.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub number: u64,
    pub body: String,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            number: message.number.get(),
            body: message.body,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMessageRequest {
    pub message: MessageAttributes,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MessageAttributes {
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub async fn create_message(
    State(state): State<AppState>,
    Path((token, chat_number)): Path<(String, u64)>,
    Json(body): Json<CreateMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let token = Token::from_string(token);
    let chat_number = parse_number(chat_number, "chat")?;
    let message = state
        .ingest
        .create_message(&token, chat_number, body.message.body)
        .await?;
    Ok((StatusCode::CREATED, Json(message.into())))
}

pub async fn list_messages(
    State(state): State<AppState>,
    Path((token, chat_number)): Path<(String, u64)>,
) -> Result<Json<Vec<MessageResponse>>, ApiError> {
    let token = Token::from_string(token);
    let chat_number = parse_number(chat_number, "chat")?;
    let messages = state.ingest.list_messages(&token, chat_number).await?;
    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

pub async fn get_message(
    State(state): State<AppState>,
    Path((token, chat_number, message_number)): Path<(String, u64, u64)>,
) -> Result<Json<MessageResponse>, ApiError> {
    let token = Token::from_string(token);
    let chat_number = parse_number(chat_number, "chat")?;
    let message_number = parse_number(message_number, "message")?;
    let message = state
        .ingest
        .get_message(&token, chat_number, message_number)
        .await?;
    Ok(Json(message.into()))
}

pub async fn search_messages(
    State(state): State<AppState>,
    Path((token, chat_number)): Path<(String, u64)>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<MessageResponse>>, ApiError> {
    let token = Token::from_string(token);
    let chat_number = parse_number(chat_number, "chat")?;
    let query = params.q.unwrap_or_default();
    let messages = state.ingest.search_messages(&token, chat_number, &query).await?;
    Ok(Json(messages.into_iter().map(Into::into).collect()))
}
