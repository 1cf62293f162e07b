//! Error handling for the REST API server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

use meishi_core::error::{ErrorCode, MeishiError};

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    // Common error constructors
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", message)
    }

    pub fn gateway_timeout(message: impl Into<String>) -> Self {
        Self::new(StatusCode::GATEWAY_TIMEOUT, "TIMEOUT", message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.status, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
                details: self.details,
            },
        };

        (self.status, Json(body)).into_response()
    }
}

// Convert from meishi-core errors
impl From<MeishiError> for ApiError {
    fn from(err: MeishiError) -> Self {
        let code = err.code();
        let suggestion = err.suggestion().map(str::to_string);

        // OCR backend problems are upstream failures, not client errors.
        let status = match &err {
            MeishiError::OcrService { .. } | MeishiError::Authentication { .. } => {
                StatusCode::BAD_GATEWAY
            }
            MeishiError::Network { .. } if code == ErrorCode::NetTimeout => {
                StatusCode::GATEWAY_TIMEOUT
            }
            MeishiError::Network { .. } => StatusCode::BAD_GATEWAY,
            MeishiError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            MeishiError::NotFound { .. } => StatusCode::NOT_FOUND,
            MeishiError::Configuration(_)
            | MeishiError::UnsupportedProvider { .. }
            | MeishiError::Storage { .. }
            | MeishiError::Parse { .. }
            | MeishiError::Io(_)
            | MeishiError::Serialization(_)
            | MeishiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let error = ApiError::new(status, code.as_str(), err.to_string());
        match suggestion {
            Some(suggestion) => error.with_details(serde_json::json!({ "suggestion": suggestion })),
            None => error,
        }
    }
}

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
