//! Payment provider REST client with deadline and error normalization.
//!
//! # Responsibilities
//! - Build authenticated requests against `{api_base}/payments/{id}/{action}`
//! - Percent-encode the payment id as a single path segment
//! - Normalize response bodies (JSON, else raw text)
//! - Classify outcomes by HTTP status alone

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Method;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::{TimeoutConfig, UpstreamConfig};
use crate::payments::gateway::PaymentGateway;
use crate::payments::types::{PaymentAction, UpstreamError, UpstreamResult};
use crate::resilience::with_deadline;

/// Characters left unescaped in a path segment, matching `encodeURIComponent`.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Client for the payment provider's server-side API.
#[derive(Clone)]
pub struct PiClient {
    http: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
    deadline: Duration,
}

impl PiClient {
    /// Create a client from validated configuration.
    pub fn new(upstream: &UpstreamConfig, timeouts: &TimeoutConfig) -> UpstreamResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(timeouts.connect())
            .build()?;

        Ok(Self {
            http,
            api_base: upstream.api_base.trim_end_matches('/').to_string(),
            api_key: upstream.api_key().map(str::to_string),
            deadline: timeouts.upstream(),
        })
    }

    /// API path for `action` on `payment_id`, relative to the base URL.
    pub fn payment_path(payment_id: &str, action: PaymentAction) -> String {
        format!(
            "/payments/{}/{}",
            utf8_percent_encode(payment_id, PATH_SEGMENT),
            action.as_str()
        )
    }

    /// Issue one authenticated call and normalize the response.
    ///
    /// Any status in `[200, 300)` is success regardless of the body.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> UpstreamResult<Value> {
        let api_key = self.api_key.as_deref().ok_or(UpstreamError::MissingApiKey)?;
        let url = format!("{}{}", self.api_base, path);
        let payload = match body {
            Some(body) => body.to_string(),
            None => String::new(),
        };

        tracing::debug!(method = %method, url = %url, "Calling payment provider");

        let request = self
            .http
            .request(method, &url)
            .header(AUTHORIZATION, format!("Key {}", api_key))
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            // hyper omits the header for an empty body; the provider gets an explicit 0.
            .header(CONTENT_LENGTH, payload.len())
            .body(payload);

        with_deadline(self.deadline, send(request, url)).await
    }

    async fn perform(
        &self,
        payment_id: &str,
        action: PaymentAction,
        body: Option<Value>,
    ) -> UpstreamResult<Value> {
        let path = Self::payment_path(payment_id, action);
        self.call(Method::POST, &path, body.as_ref()).await
    }
}

async fn send(request: reqwest::RequestBuilder, url: String) -> UpstreamResult<Value> {
    let response = request.send().await?;
    let status = response.status();
    let parsed = normalize_body(response.text().await?);

    if status.is_success() {
        Ok(parsed)
    } else {
        tracing::warn!(url = %url, status = status.as_u16(), "Payment provider rejected call");
        Err(UpstreamError::from_status(status.as_u16(), parsed))
    }
}

/// Empty → `null`, JSON → parsed value, anything else → the raw text.
fn normalize_body(text: String) -> Value {
    if text.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

#[async_trait]
impl PaymentGateway for PiClient {
    async fn approve(&self, payment_id: &str) -> UpstreamResult<Value> {
        self.perform(payment_id, PaymentAction::Approve, None).await
    }

    async fn complete(&self, payment_id: &str, txid: &str) -> UpstreamResult<Value> {
        self.perform(payment_id, PaymentAction::Complete, Some(json!({ "txid": txid })))
            .await
    }

    async fn cancel(&self, payment_id: &str) -> UpstreamResult<Value> {
        self.perform(payment_id, PaymentAction::Cancel, None).await
    }
}

impl std::fmt::Debug for PiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PiClient")
            .field("api_base", &self.api_base)
            .field("has_api_key", &self.api_key.is_some())
            .field("deadline", &self.deadline)
            .finish()
    }
}
