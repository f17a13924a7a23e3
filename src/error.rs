use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::generation::GenerateError;

/// Unified application error type for the HTTP surface.
///
/// Client-caused failures carry their message through to the response body;
/// upstream and internal failures keep the detail in the logs and send a
/// stable message instead.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Internal(String),
}

/// Flat `{"error": ...}` body used by every error response.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// What the client sees in the `error` field.
    fn public_message(&self) -> String {
        match self {
            Self::BadRequest(msg) | Self::NotFound(msg) => msg.clone(),
            Self::Upstream(_) => {
                "AI service temporarily unavailable. Please try again later.".to_string()
            }
            Self::Internal(_) => "Internal server error. Please try again later.".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::Upstream(detail) => {
                tracing::error!(%status, detail = %detail, "Provider failure surfaced to client");
            }
            Self::Internal(detail) => {
                tracing::error!(%status, detail = %detail, "Internal error surfaced to client");
            }
            Self::BadRequest(msg) | Self::NotFound(msg) => {
                tracing::debug!(%status, message = %msg, "Request rejected");
            }
        }
        let body = ErrorResponse {
            error: self.public_message(),
        };
        (status, axum::Json(body)).into_response()
    }
}

impl From<GenerateError> for AppError {
    fn from(err: GenerateError) -> Self {
        match &err {
            GenerateError::Validation(_) => Self::BadRequest(err.to_string()),
            GenerateError::TemplateNotFound(_) => Self::NotFound(err.to_string()),
            GenerateError::Provider(_) => Self::Upstream(err.to_string()),
            GenerateError::Content(_) => Self::Internal(err.to_string()),
        }
    }
}
