use axum::{
    extract::rejection::{BytesRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure of any outbound call on the chat path (identity service, moderation,
/// completion, hosted agent).
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} did not respond before the timeout")]
    Timeout { service: &'static str },

    #[error("{service} returned {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("{service} returned a malformed response: {reason}")]
    Malformed {
        service: &'static str,
        reason: String,
    },
}

impl UpstreamError {
    /// Classifies a reqwest failure, separating timeouts from other transport errors.
    pub fn from_reqwest(service: &'static str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            UpstreamError::Timeout { service }
        } else if source.is_decode() {
            UpstreamError::Malformed {
                service,
                reason: source.to_string(),
            }
        } else {
            UpstreamError::Transport { service, source }
        }
    }

    pub fn malformed(service: &'static str, reason: impl Into<String>) -> Self {
        UpstreamError::Malformed {
            service,
            reason: reason.into(),
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Not found")]
    NotFound,

    /// A request axum refused to extract (oversized body, bad path segment).
    #[error("Rejected request: {message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("VM API is unreachable: {0}")]
    VmUnreachable(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                json!({ "error": "Method not allowed" }),
            ),
            AppError::NotFound => (StatusCode::NOT_FOUND, json!({ "error": "Not found" })),
            AppError::Rejected { status, message } => (*status, json!({ "error": message })),
            AppError::Upstream(e) => {
                tracing::error!("Chat error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Chat failed", "detail": e.to_string() }),
                )
            }
            AppError::VmUnreachable(msg) => {
                tracing::error!("VM API unreachable: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    json!({ "error": "VM API is unreachable", "details": msg }),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error", "detail": e.to_string() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}
