//! HTTP front door.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, middleware stack)
//!     → request.rs (request id, trace span, metrics)
//!     → body.rs (size-capped JSON body)
//!     → payment.rs / index.rs (handlers)
//!     → error.rs / response.rs (JSON envelopes, content types)
//!     → Send to client
//! ```

pub mod body;
pub mod error;
pub mod index;
pub mod payment;
pub mod request;
pub mod response;
pub mod server;

pub use error::{ApiError, ErrorEnvelope};
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
