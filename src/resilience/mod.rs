//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Payment action:
//!     → timeouts.rs (deadline around the upstream round trip)
//!     → on expiry: UpstreamError::Timeout → 504
//! ```
//!
//! Payment actions are not idempotent on the provider side, so nothing here
//! retries: every action is attempted exactly once.

pub mod timeouts;

pub use timeouts::with_deadline;
