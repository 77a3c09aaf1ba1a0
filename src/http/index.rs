//! Static page served on `/` and `/index.html`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;

use crate::http::error::ApiError;
use crate::http::response::{html, text};
use crate::http::server::AppState;

/// Read the page from disk on every request so edits show up without a restart.
pub async fn serve_index(State(state): State<AppState>) -> Response {
    match tokio::fs::read(state.index_path.as_path()).await {
        Ok(content) => html(content),
        Err(e) => {
            tracing::error!(
                path = %state.index_path.display(),
                error = %e,
                "Failed to read index page"
            );
            text(StatusCode::INTERNAL_SERVER_ERROR, "Failed to read index.html")
        }
    }
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
