//! Error-to-response mapping for the front door.
//!
//! Every failure path ends in a JSON envelope; nothing a client sends or the
//! provider answers can take the process down.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::http::response::json;
use crate::payments::{InvalidRequest, PaymentAction, UpstreamError};

/// JSON body returned for every error.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(flatten)]
    pub upstream: Option<UpstreamDetail>,
}

/// Diagnostics passed through from a failed provider call.
#[derive(Debug, Serialize)]
pub struct UpstreamDetail {
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: Option<u16>,
    pub response: Value,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Invalid(#[from] InvalidRequest),

    #[error("Request body too large")]
    BodyTooLarge,

    #[error("Failed to read request body")]
    BodyRead,

    #[error("Invalid JSON")]
    InvalidJson,

    #[error("Not found")]
    NotFound,

    #[error("{}", .action.failure_label())]
    Upstream {
        action: PaymentAction,
        #[source]
        source: UpstreamError,
    },

    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Invalid(_)
            | ApiError::BodyTooLarge
            | ApiError::BodyRead
            | ApiError::InvalidJson => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Upstream { source, .. } => match source {
                UpstreamError::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
                UpstreamError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                UpstreamError::Status { .. } | UpstreamError::Transport(_) => {
                    StatusCode::BAD_GATEWAY
                }
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        let upstream = match self {
            ApiError::Upstream { source, .. } => Some(UpstreamDetail {
                message: source.to_string(),
                status_code: source.status_code(),
                response: source.response(),
            }),
            _ => None,
        };
        ErrorEnvelope {
            error: self.to_string(),
            upstream,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Upstream { action, source: UpstreamError::MissingApiKey } => {
                tracing::error!(action = %action, "PI_SERVER_API_KEY is not set");
            }
            ApiError::Upstream { action, source } => {
                tracing::warn!(
                    action = %action,
                    kind = source.kind(),
                    error = %source,
                    "Payment action failed"
                );
            }
            ApiError::Internal(detail) => tracing::error!(error = %detail, "Internal error"),
            _ => {}
        }

        json(self.status(), &self.envelope())
    }
}
