use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum CodexError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("You need to log in to do that")]
    Unauthenticated,

    #[error("Invalid authentication token")]
    InvalidToken,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Request body too large")]
    PayloadTooLarge,
}

impl CodexError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            CodexError::DatabaseError(_) | CodexError::IoError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            CodexError::InvalidToken => StatusCode::UNAUTHORIZED,
            CodexError::Unauthenticated | CodexError::InvalidApiKey | CodexError::Forbidden(_) => {
                StatusCode::FORBIDDEN
            }
            CodexError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CodexError::NotFound(_) => StatusCode::NOT_FOUND,
            CodexError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            CodexError::DatabaseError(_) | CodexError::IoError(_) => "INTERNAL_ERROR",
            CodexError::InvalidToken => "UNAUTHORIZED",
            CodexError::Unauthenticated => "NOT_AUTHENTICATED",
            CodexError::InvalidApiKey | CodexError::Forbidden(_) => "FORBIDDEN",
            CodexError::BadRequest(_) => "BAD_REQUEST",
            CodexError::NotFound(_) => "NOT_FOUND",
            CodexError::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
        }
    }
}

impl IntoResponse for CodexError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!(error = %self, "request failed");
            "An internal server error occurred.".to_string()
        } else {
            self.to_string()
        };

        let body = ApiErrorBody {
            code: self.code().to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

/// Standardized API error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}
