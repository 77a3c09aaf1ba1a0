//! The payment provider capability seen by the HTTP layer.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Instant;

use crate::observability::metrics;
use crate::payments::types::{PaymentAction, PaymentActionRequest, UpstreamResult};

/// Payment actions the relay can perform upstream.
///
/// `PiClient` talks to the real provider; tests substitute an in-memory fake.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn approve(&self, payment_id: &str) -> UpstreamResult<Value>;

    async fn complete(&self, payment_id: &str, txid: &str) -> UpstreamResult<Value>;

    async fn cancel(&self, payment_id: &str) -> UpstreamResult<Value>;
}

/// Route a validated request to the matching gateway operation.
pub async fn dispatch(
    gateway: &dyn PaymentGateway,
    request: &PaymentActionRequest,
) -> UpstreamResult<Value> {
    let start = Instant::now();
    let result = match request.action {
        PaymentAction::Approve => gateway.approve(&request.payment_id).await,
        PaymentAction::Complete => {
            gateway
                .complete(&request.payment_id, request.txid.as_deref().unwrap_or_default())
                .await
        }
        PaymentAction::Cancel => gateway.cancel(&request.payment_id).await,
    };

    let outcome = match &result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    metrics::record_upstream_call(request.action.as_str(), outcome, start);
    result
}
