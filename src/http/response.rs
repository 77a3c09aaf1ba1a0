//! Response builders.
//!
//! Content types carry an explicit charset. `Cache-Control: no-store` is added
//! to every response by the router's header layer, not here.

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

pub const JSON_UTF8: &str = "application/json; charset=utf-8";
pub const TEXT_UTF8: &str = "text/plain; charset=utf-8";
pub const HTML_UTF8: &str = "text/html; charset=utf-8";

/// Serialize `value` as the response body.
pub fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(bytes) => with_type(status, JSON_UTF8, bytes),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize response body");
            text(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

pub fn text(status: StatusCode, body: &'static str) -> Response {
    with_type(status, TEXT_UTF8, body)
}

pub fn html(body: Vec<u8>) -> Response {
    with_type(StatusCode::OK, HTML_UTF8, body)
}

fn with_type(status: StatusCode, content_type: &'static str, body: impl Into<Body>) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static(content_type))],
        body.into(),
    )
        .into_response()
}
