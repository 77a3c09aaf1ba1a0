//! JSON body extraction with a size cap.
//!
//! The cap comes from `DefaultBodyLimit` on the router. Oversized and malformed
//! bodies are ordinary 400 responses.

use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, FailedToBufferBody};
use axum::extract::{FromRequest, Request};
use serde_json::{Map, Value};

use crate::http::error::ApiError;

/// A request body parsed as JSON; an empty body is an empty object.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(request, state).await.map_err(|rejection| match rejection {
            BytesRejection::FailedToBufferBody(FailedToBufferBody::LengthLimitError(_)) => {
                ApiError::BodyTooLarge
            }
            other => {
                tracing::debug!(error = %other, "Failed to read request body");
                ApiError::BodyRead
            }
        })?;
        parse_body(&bytes).map(JsonBody)
    }
}

/// Parse raw body bytes.
pub fn parse_body(bytes: &[u8]) -> Result<Value, ApiError> {
    if bytes.is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(bytes).map_err(|_| ApiError::InvalidJson)
}
