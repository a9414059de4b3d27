//! API error handling
//!
//! Translates `ApplicationError` into HTTP responses at the edge. A domain
//! validation failure becomes the `422 {"errors": {field: [message]}}`
//! envelope; everything else becomes `{"error": message}` at the matching
//! status code.

use application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::DomainError;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// API error type, one variant per HTTP status this service returns.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// `422` body: `{"errors": {"<field>": ["<msg>", ...]}}`.
#[derive(Debug, Serialize)]
struct ValidationErrorBody {
    errors: HashMap<String, Vec<String>>,
}

/// Every other error body: `{"error": "<msg>"}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation { field, message } => {
                let mut errors = HashMap::new();
                errors.insert(field, vec![message]);
                (StatusCode::UNPROCESSABLE_ENTITY, Json(ValidationErrorBody { errors })).into_response()
            },
            Self::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody { error: msg })).into_response()
            },
            Self::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(ErrorBody { error: msg })).into_response()
            },
            Self::Conflict(msg) => {
                (StatusCode::CONFLICT, Json(ErrorBody { error: msg })).into_response()
            },
            Self::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody { error: msg })).into_response()
            },
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(DomainError::ValidationError { field, message }) => {
                Self::Validation { field, message }
            },
            ApplicationError::Domain(e @ DomainError::NotFound { .. }) => Self::NotFound(e.to_string()),
            ApplicationError::Domain(e @ DomainError::NotPermitted(_)) => Self::BadRequest(e.to_string()),
            ApplicationError::NotFound(msg) => Self::NotFound(msg),
            ApplicationError::Conflict(msg) => Self::Conflict(msg),
            ApplicationError::InvalidQuery(msg) => Self::BadRequest(msg),
            ApplicationError::CounterStore(msg)
            | ApplicationError::LogStore(msg)
            | ApplicationError::JobQueue(msg)
            | ApplicationError::SearchIndex(msg)
            | ApplicationError::Internal(msg) => Self::Internal(msg),
        }
    }
}
