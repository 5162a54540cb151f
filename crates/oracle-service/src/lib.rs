//! Service wrapper for the market-fact oracle.
//!
//! Exposes the oracle over HTTP. The binary in `main.rs` loads configuration,
//! assembles the oracle and serves this API.

pub mod api;
