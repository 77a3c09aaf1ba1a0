//! Payment action handlers: `POST /payment/{approve,complete,cancel}`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;

use crate::http::body::JsonBody;
use crate::http::error::ApiError;
use crate::http::response::json;
use crate::http::server::AppState;
use crate::payments::{dispatch, PaymentAction, PaymentActionRequest};

pub async fn approve(State(state): State<AppState>, body: JsonBody) -> Result<Response, ApiError> {
    relay(state, PaymentAction::Approve, body).await
}

pub async fn complete(State(state): State<AppState>, body: JsonBody) -> Result<Response, ApiError> {
    relay(state, PaymentAction::Complete, body).await
}

pub async fn cancel(State(state): State<AppState>, body: JsonBody) -> Result<Response, ApiError> {
    relay(state, PaymentAction::Cancel, body).await
}

/// Validate, call the provider once, and pass its result through.
async fn relay(
    state: AppState,
    action: PaymentAction,
    JsonBody(body): JsonBody,
) -> Result<Response, ApiError> {
    let request = PaymentActionRequest::from_body(action, &body)?;

    tracing::info!(action = %action, payment_id = %request.payment_id, "Relaying payment action");

    // The call runs on its own task so a client hanging up mid-request does
    // not abandon a payment action the provider may already be processing.
    let gateway = state.gateway.clone();
    let task = tokio::spawn(async move { dispatch(gateway.as_ref(), &request).await });

    match task.await {
        Ok(Ok(result)) => Ok(json(StatusCode::OK, &result)),
        Ok(Err(source)) => Err(ApiError::Upstream { action, source }),
        Err(e) => Err(ApiError::Internal(e.to_string())),
    }
}
