//! Pi payment relay library.
//!
//! A thin server-side intermediary between a client app and the Pi payment
//! API: each inbound request becomes exactly one authenticated upstream call.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod payments;
pub mod resilience;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use payments::{PaymentGateway, PiClient};
