//! `/api/v1/chat_applications/:token/chats` handlers

use axum::{Json, extract::Path, extract::State, http::StatusCode};
use domain::Chat;
use domain::value_objects::{Number, Token};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::ApiError, state::AppState};

/// A chat as it appears on the wire: addressed by its per-application `number`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponse {
    pub number: u64,
    pub messages_count: i64,
}

impl From<Chat> for ChatResponse {
    fn from(chat: Chat) -> Self {
        Self {
            number: chat.number.get(),
            messages_count: chat.messages_count,
        }
    }
}

pub async fn create_chat(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<(StatusCode, Json<ChatResponse>), ApiError> {
    let token = Token::from_string(token);
    let chat = state.ingest.create_chat(&token).await?;
    Ok((StatusCode::CREATED, Json(chat.into())))
}

pub async fn list_chats(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<Vec<ChatResponse>>, ApiError> {
    let token = Token::from_string(token);
    let chats = state.ingest.list_chats(&token).await?;
    Ok(Json(chats.into_iter().map(Into::into).collect()))
}

pub async fn get_chat(
    State(state): State<AppState>,
    Path((token, number)): Path<(String, u64)>,
) -> Result<Json<ChatResponse>, ApiError> {
    let token = Token::from_string(token);
    let number = parse_number(number, "chat")?;
    let chat = state.ingest.get_chat(&token, number).await?;
    Ok(Json(chat.into()))
}

/// `Number` is 1-based; a path segment of `0` can never address a real
/// chat or message, so it is a 404 rather than a panic.
pub(crate) fn parse_number(raw: u64, kind: &str) -> Result<Number, ApiError> {
    if raw == 0 {
        return Err(ApiError::NotFound(format!("{kind} 0")));
    }
    Ok(Number::new(raw))
}
