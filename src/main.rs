//! Pi payment relay.
//!
//! Keeps the payment provider's server API key out of client code by relaying
//! approve / complete / cancel calls, and serves the app's single HTML page.
//!
//! ```text
//!     Client app                    PAYMENT RELAY                        Provider
//!   ─────────────▶ http::server ──▶ payments::types ──▶ payments::client ─────▶
//!                  (routes, body     (validate          (Authorization: Key,
//!                   limit, ids)       paymentId/txid)    deadline)
//!   ◀───────────── http::error / http::response ◀──────────────────────────────
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use pi_payment_relay::config::{load_config, ObservabilityConfig};
use pi_payment_relay::http::HttpServer;
use pi_payment_relay::lifecycle::{signals, Shutdown};
use pi_payment_relay::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "pi-payment-relay", version)]
#[command(about = "Relays payment approve/complete/cancel calls to the Pi API", long_about = None)]
struct Cli {
    /// TOML configuration file; environment variables override its values.
    #[arg(short, long, env = "RELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Listen port, overriding PORT and the config file.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref(), cli.port) {
        Ok(config) => config,
        Err(e) => {
            logging::init(&ObservabilityConfig::default());
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };
    logging::init(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "pi-payment-relay starting");
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        api_base = %config.upstream.api_base,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        index_path = %config.static_files.index_path.display(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Server running");

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
