use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {message}")]
    BadRequest { message: String },
    #[error("not found: {message}")]
    NotFound { message: &'static str },
    #[error("{message}: {detail}")]
    Upstream {
        message: &'static str,
        detail: String,
    },
    #[error("internal error")]
    Internal { message: String },
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn not_found(message: &'static str) -> Self {
        Self::NotFound { message }
    }

    /// A failed call to GitHub, the domain probe or the document store. The
    /// detail reaches the client unchanged.
    pub fn upstream(message: &'static str, detail: impl Into<String>) -> Self {
        Self::Upstream {
            message,
            detail: detail.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Re-labels an upstream failure with the message of the operation that
    /// observed it, keeping the detail.
    pub fn in_context(self, message: &'static str) -> Self {
        match self {
            Self::Upstream { detail, .. } => Self::Upstream { message, detail },
            other => other,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::BadRequest { message } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    message,
                    error: None,
                },
            ),
            Self::NotFound { message } => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    message: message.to_string(),
                    error: None,
                },
            ),
            Self::Upstream { message, detail } => {
                tracing::error!(error = %detail, "{message}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        message: message.to_string(),
                        error: Some(detail),
                    },
                )
            }
            Self::Internal { message } => {
                tracing::error!(error = %message, "request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        message: "internal server error".to_string(),
                        error: None,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
