//! Payment relay subsystem.
//!
//! # Data Flow
//! ```text
//! parsed JSON body
//!     → types.rs (PaymentActionRequest validation)
//!     → gateway.rs (dispatch to approve/complete/cancel)
//!     → client.rs (one authenticated HTTPS call to the provider)
//!     → UpstreamResult (provider JSON or raw text)
//! ```
//!
//! # Security Constraints
//! - The API key only ever leaves the process in the `Authorization` header
//! - Payment ids are percent-encoded into exactly one path segment

pub mod client;
pub mod gateway;
pub mod types;

pub use client::PiClient;
pub use gateway::{dispatch, PaymentGateway};
pub use types::{InvalidRequest, PaymentAction, PaymentActionRequest, UpstreamError, UpstreamResult};
