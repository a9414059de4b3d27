//! `/api/v1/chat_applications` handlers

use axum::{Json, extract::Path, extract::State, http::StatusCode};
use domain::Application;
use domain::value_objects::Token;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::ApiError, state::AppState};

/// An application as it appears on the wire: internal ids never leave the process.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApplicationResponse {
    pub name: String,
    pub token: String,
    pub chats_count: i64,
}

impl From<Application> for ApplicationResponse {
    fn from(app: Application) -> Self {
        Self {
            name: app.name,
            token: app.token.to_string(),
            chats_count: app.chats_count,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateApplicationRequest {
    pub chat_application: ApplicationAttributes,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateApplicationRequest {
    pub chat_application: ApplicationAttributes,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApplicationAttributes {
    pub name: String,
}

pub async fn create_application(
    State(state): State<AppState>,
    Json(body): Json<CreateApplicationRequest>,
) -> Result<(StatusCode, Json<ApplicationResponse>), ApiError> {
    let app = state.ingest.create_application(body.chat_application.name).await?;
    Ok((StatusCode::CREATED, Json(app.into())))
}

pub async fn list_applications(
    State(state): State<AppState>,
) -> Result<Json<Vec<ApplicationResponse>>, ApiError> {
    let apps = state.ingest.list_applications().await?;
    Ok(Json(apps.into_iter().map(Into::into).collect()))
}

pub async fn get_application(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<ApplicationResponse>, ApiError> {
    let token = Token::from_string(token);
    let app = state.ingest.get_application(&token).await?;
    Ok(Json(app.into()))
}

pub async fn update_application(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(body): Json<UpdateApplicationRequest>,
) -> Result<Json<ApplicationResponse>, ApiError> {
    let token = Token::from_string(token);
    let app = state
        .ingest
        .update_application(&token, body.chat_application.name)
        .await?;
    Ok(Json(app.into()))
}
