//! Client for the Pi payment relay, as a client app would call it.

pub mod client;

pub use client::{RelayClient, RelayResponse};
