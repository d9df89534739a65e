use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use llmapi::LLMError;
use thiserror::Error;

use crate::models::ErrorBody;
use crate::operations::Endpoint;
use crate::styles::available_styles;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API key required")]
    MissingCredential,

    #[error("Invalid API key format")]
    InvalidCredential,

    #[error("Invalid JSON body: {0}")]
    InvalidJson(String),

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Unknown endpoint")]
    UnknownEndpoint(String),

    #[error("{message}")]
    Validation {
        message: String,
        list_styles: bool,
    },

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("AI credits depleted. Please add credits to continue.")]
    QuotaExhausted,

    #[error("AI service error: {0}")]
    Upstream(u16),

    #[error("Failed to {}. Please try again.", .0.failure_verb())]
    Extraction(Endpoint),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            list_styles: false,
        }
    }

    pub fn missing_style() -> Self {
        ApiError::Validation {
            message: "style or customStyle is required".to_string(),
            list_styles: true,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingCredential | ApiError::InvalidCredential => StatusCode::UNAUTHORIZED,
            ApiError::InvalidJson(_)
            | ApiError::UnknownEndpoint(_)
            | ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::QuotaExhausted => StatusCode::PAYMENT_REQUIRED,
            ApiError::Upstream(_) | ApiError::Extraction(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        let mut body = ErrorBody::new(self.to_string());
        match self {
            ApiError::MissingCredential => {
                body.message = Some(
                    "Please provide your API key in the x-api-key header or as a Bearer token"
                        .to_string(),
                );
            }
            ApiError::UnknownEndpoint(_) => {
                body.available_endpoints = Some(Endpoint::ALL.iter().map(Endpoint::as_str).collect());
            }
            ApiError::Validation {
                list_styles: true, ..
            } => {
                body.available_styles = Some(available_styles());
            }
            _ => {}
        }
        body
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::InvalidJson(rejection.body_text())
        }
    }
}

impl From<LLMError> for ApiError {
    fn from(err: LLMError) -> Self {
        match err {
            LLMError::Status { status: 429, .. } => ApiError::RateLimited,
            LLMError::Status { status: 402, .. } => ApiError::QuotaExhausted,
            LLMError::Status { status, .. } => ApiError::Upstream(status),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.to_body())).into_response()
    }
}
