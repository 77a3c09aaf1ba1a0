//! Payment action types and error definitions.

use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// One of the state transitions the relay performs on an existing payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentAction {
    Approve,
    Complete,
    Cancel,
}

impl PaymentAction {
    /// Final path segment on the provider API, also used as a metrics label.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentAction::Approve => "approve",
            PaymentAction::Complete => "complete",
            PaymentAction::Cancel => "cancel",
        }
    }

    /// `error` field of the envelope returned when this action fails upstream.
    pub fn failure_label(&self) -> &'static str {
        match self {
            PaymentAction::Approve => "Pi API approve failed",
            PaymentAction::Complete => "Pi API complete failed",
            PaymentAction::Cancel => "Pi API cancel failed",
        }
    }

    fn requires_txid(&self) -> bool {
        matches!(self, PaymentAction::Complete)
    }
}

impl fmt::Display for PaymentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client input that fails validation before anything is sent upstream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRequest {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("paymentId is invalid")]
    BadPaymentId,
}

/// A validated payment action, ready to hand to a [`PaymentGateway`](super::PaymentGateway).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentActionRequest {
    pub action: PaymentAction,
    pub payment_id: String,
    /// Blockchain transaction id; present only for [`PaymentAction::Complete`].
    pub txid: Option<String>,
}

impl PaymentActionRequest {
    /// Extract and validate the fields `action` needs from a parsed JSON body.
    ///
    /// A body that is not a JSON object behaves like an empty one.
    pub fn from_body(action: PaymentAction, body: &Value) -> Result<Self, InvalidRequest> {
        let payment_id = field(body, "paymentId").ok_or(InvalidRequest::Missing("paymentId"))?;

        // URL parsers collapse dot segments even when they are percent-encoded,
        // so these two ids would escape /payments/{id}/.
        if payment_id == "." || payment_id == ".." {
            return Err(InvalidRequest::BadPaymentId);
        }

        let txid = if action.requires_txid() {
            Some(field(body, "txid").ok_or(InvalidRequest::Missing("txid"))?)
        } else {
            None
        };

        Ok(Self {
            action,
            payment_id,
            txid,
        })
    }
}

/// Scalar fields with a "truthy" value become strings; everything else is missing.
fn field(body: &Value, name: &str) -> Option<String> {
    match body.get(name)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        // Floats render the way JavaScript prints them: 1.0 is "1".
        Value::Number(n) if n.as_f64() != Some(0.0) => match n.as_f64() {
            Some(f) if n.is_f64() => Some(f.to_string()),
            _ => Some(n.to_string()),
        },
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Errors that can occur while talking to the payment provider.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// No API key configured; a local fault, not a provider failure.
    #[error("PI_SERVER_API_KEY is not set")]
    MissingApiKey,

    /// The provider answered outside the 2xx range.
    #[error("{message}")]
    Status {
        status: u16,
        message: String,
        response: Value,
    },

    /// Connection, TLS, or body read failure.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// No answer within the configured deadline.
    #[error("upstream request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

impl UpstreamError {
    /// Build a status error from a normalized response body.
    pub fn from_status(status: u16, response: Value) -> Self {
        let message = match &response {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        UpstreamError::Status {
            status,
            message,
            response,
        }
    }

    /// The status code reported in the error envelope.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            UpstreamError::MissingApiKey => Some(500),
            UpstreamError::Status { status, .. } => Some(*status),
            UpstreamError::Transport(e) => e.status().map(|s| s.as_u16()),
            UpstreamError::Timeout(_) => None,
        }
    }

    /// The raw provider response, or `null` when there was none.
    pub fn response(&self) -> Value {
        match self {
            UpstreamError::Status { response, .. } => response.clone(),
            _ => Value::Null,
        }
    }

    /// Short outcome label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::MissingApiKey => "config",
            UpstreamError::Status { .. } => "status",
            UpstreamError::Transport(_) => "transport",
            UpstreamError::Timeout(_) => "timeout",
        }
    }
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn approve(body: Value) -> Result<PaymentActionRequest, InvalidRequest> {
        PaymentActionRequest::from_body(PaymentAction::Approve, &body)
    }

    #[test]
    fn test_approve_requires_payment_id() {
        for body in [json!({}), json!({"paymentId": ""}), json!({"paymentId": null}), json!([])] {
            assert_eq!(
                PaymentActionRequest::from_body(PaymentAction::Approve, &body),
                Err(InvalidRequest::Missing("paymentId"))
            );
        }
    }

    #[test]
    fn test_complete_requires_txid() {
        let err = PaymentActionRequest::from_body(
            PaymentAction::Complete,
            &json!({"paymentId": "XYZ"}),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "txid is required");
    }

    #[test]
    fn test_payment_id_checked_before_txid() {
        let err = PaymentActionRequest::from_body(PaymentAction::Complete, &json!({"txid": "T1"}))
            .unwrap_err();
        assert_eq!(err, InvalidRequest::Missing("paymentId"));
    }

    #[test]
    fn test_txid_ignored_outside_complete() {
        let req = PaymentActionRequest::from_body(
            PaymentAction::Cancel,
            &json!({"paymentId": "abc", "txid": "T1"}),
        )
        .unwrap();
        assert_eq!(req.payment_id, "abc");
        assert_eq!(req.txid, None);
    }

    #[test]
    fn test_scalar_coercion() {
        let req = PaymentActionRequest::from_body(
            PaymentAction::Complete,
            &json!({"paymentId": 42, "txid": true}),
        )
        .unwrap();
        assert_eq!(req.payment_id, "42");
        assert_eq!(req.txid.as_deref(), Some("true"));

        assert_eq!(approve(json!({"paymentId": 1.0})).unwrap().payment_id, "1");
        assert_eq!(approve(json!({"paymentId": 2.5})).unwrap().payment_id, "2.5");

        assert!(approve(json!({"paymentId": 0})).is_err());
        assert!(approve(json!({"paymentId": {"a": 1}})).is_err());
    }

    #[test]
    fn test_dot_segments_rejected() {
        for id in [".", ".."] {
            assert_eq!(
                approve(json!({ "paymentId": id })),
                Err(InvalidRequest::BadPaymentId)
            );
        }
        assert!(approve(json!({"paymentId": "..."})).is_ok());
    }

    #[test]
    fn test_status_error_message() {
        let err = UpstreamError::from_status(400, json!({"error": "already completed"}));
        assert_eq!(err.to_string(), r#"{"error":"already completed"}"#);
        assert_eq!(err.status_code(), Some(400));

        let err = UpstreamError::from_status(503, Value::String("maintenance".into()));
        assert_eq!(err.to_string(), "maintenance");
        assert_eq!(err.response(), json!("maintenance"));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(UpstreamError::MissingApiKey.to_string(), "PI_SERVER_API_KEY is not set");
        assert_eq!(UpstreamError::MissingApiKey.status_code(), Some(500));
        let err = UpstreamError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "upstream request timed out after 30s");
        assert_eq!(err.status_code(), None);
    }
}
