use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::paste::PasteError;

/// Wire error shape (§6.1 `ErrResp`): a short human string, plus the two
/// situational fields the boundary contract calls out.
#[derive(Debug, Serialize)]
pub struct ErrResp {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

/// Error response for the HTTP boundary (§7): status code plus the
/// human-readable message surfaced to the caller.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    max_size: Option<String>,
    retry_after: Option<u64>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            max_size: None,
            retry_after: None,
        }
    }

    pub fn with_max_size(mut self, max_size: impl Into<String>) -> Self {
        self.max_size = Some(max_size.into());
        self
    }

    pub fn with_retry_after(mut self, retry_after: u64) -> Self {
        self.retry_after = Some(retry_after);
        self
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = ErrResp {
            error: self.message,
            max_size: self.max_size,
            retry_after: self.retry_after,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Maps the paste orchestrator's error taxonomy onto HTTP status codes (§7).
impl From<PasteError> for ApiError {
    fn from(err: PasteError) -> Self {
        match err {
            PasteError::EmptyContent => {
                ApiError::new(StatusCode::BAD_REQUEST, "content must not be empty")
            }
            PasteError::ContentTooLarge => ApiError::new(
                StatusCode::PAYLOAD_TOO_LARGE,
                "content exceeds the maximum allowed size",
            )
            .with_max_size("1MB"),
            PasteError::InvalidSyntaxType => ApiError::new(
                StatusCode::BAD_REQUEST,
                "syntax type is not in the supported whitelist",
            ),
            PasteError::InvalidExpiresIn => {
                ApiError::new(StatusCode::BAD_REQUEST, "expires_in could not be parsed")
            }
            PasteError::NotFound => ApiError::new(StatusCode::NOT_FOUND, "Paste not found"),
            PasteError::Expired => ApiError::new(StatusCode::GONE, "Paste has expired"),
            PasteError::NoKeysAvailable => ApiError::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "service temporarily unavailable, try again shortly",
            )
            .with_retry_after(5),
            PasteError::Duplicate => {
                tracing::error!("short_id collision on insert: KGS invariant breach");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }
            PasteError::Transient(msg) => {
                tracing::error!(error = %msg, "transient downstream error");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }
        }
    }
}
