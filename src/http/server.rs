//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router for the static page and the payment routes
//! - Wire up middleware (request id, tracing, metrics, body limit, no-store)
//! - Bind the router to a listener and drain on shutdown

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::{middleware, Router};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::RelayConfig;
use crate::http::index::{not_found, serve_index};
use crate::http::payment;
use crate::http::request::{make_span, track_metrics, MakeRequestUuidV4};
use crate::lifecycle::shutdown::wait_for;
use crate::payments::{PaymentGateway, PiClient, UpstreamResult};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn PaymentGateway>,
    pub index_path: Arc<PathBuf>,
}

/// HTTP front door for the payment relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a server talking to the payment provider configured in `config`.
    pub fn new(config: RelayConfig) -> UpstreamResult<Self> {
        let client = PiClient::new(&config.upstream, &config.timeouts)?;
        tracing::debug!(client = ?client, "Payment provider client ready");
        Ok(Self::with_gateway(config, Arc::new(client)))
    }

    /// Create a server backed by an arbitrary gateway.
    pub fn with_gateway(config: RelayConfig, gateway: Arc<dyn PaymentGateway>) -> Self {
        let state = AppState {
            gateway,
            index_path: Arc::new(config.static_files.index_path.clone()),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Known paths hit with the wrong method fall through to 404, same as
    /// unknown paths. That includes HEAD, which `get` would otherwise answer.
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(serve_index).head(not_found).fallback(not_found))
            .route("/index.html", get(serve_index).head(not_found).fallback(not_found))
            .route("/payment/approve", post(payment::approve).fallback(not_found))
            .route("/payment/complete", post(payment::complete).fallback(not_found))
            .route("/payment/cancel", post(payment::cancel).fallback(not_found))
            .fallback(not_found)
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.limits.max_body_bytes))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http().make_span_with(make_span))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(SetResponseHeaderLayer::overriding(
                        header::CACHE_CONTROL,
                        HeaderValue::from_static("no-store"),
                    ))
                    .layer(middleware::from_fn(track_metrics)),
            )
    }

    /// The fully layered router, for serving or driving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            api_base = %self.config.upstream.api_base,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
