use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use advisor_ai::UpstreamError;
use advisor_types::api::{ErrorResponse, NotFoundResponse};

/// Failures of the chat operations, each with a fixed HTTP mapping.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Message is required")]
    Validation,

    #[error("Invalid JSON body: {0}")]
    BadRequest(String),

    #[error("Invalid query string: {0}")]
    BadQuery(String),

    #[error("AI API error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("No chat history found")]
    NotFound,

    #[error("Storage error")]
    Storage(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation | ApiError::BadRequest(_) | ApiError::BadQuery(_) => {
                let body = ErrorResponse { error: self.to_string() };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ApiError::Upstream(_) => {
                let body = ErrorResponse { error: self.to_string() };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
            ApiError::NotFound => {
                let body = NotFoundResponse { message: self.to_string() };
                (StatusCode::NOT_FOUND, Json(body)).into_response()
            }
            ApiError::Storage(ref e) => {
                // Details stay in the log; callers get the generic message.
                error!("Storage failure: {:#}", e);
                let body = ErrorResponse { error: self.to_string() };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}
