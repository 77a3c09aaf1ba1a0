//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

use pi_payment_relay::config::RelayConfig;
use pi_payment_relay::http::HttpServer;
use pi_payment_relay::lifecycle::Shutdown;

/// A relay running on an ephemeral port, stopped on drop.
pub struct RunningRelay {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl RunningRelay {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for RunningRelay {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Relay config pointed at `api_base` with a test API key.
pub fn relay_config(api_base: &str) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.listener.host = "127.0.0.1".to_string();
    config.listener.port = 0;
    config.upstream.api_base = api_base.to_string();
    config.upstream.api_key = Some("test-key".to_string());
    config
}

/// Start the relay in the background and wait until it accepts connections.
pub async fn start_relay(config: RelayConfig) -> RunningRelay {
    let listener = TcpListener::bind(config.listener.bind_address()).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    for _ in 0..50 {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    RunningRelay { addr, shutdown }
}
