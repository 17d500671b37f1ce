//! QuantPlay Core Library
//!
//! Shared functionality for the QuantPlay MCP adapter:
//! - Configuration from the process environment (API key, endpoint, timeout)
//! - Authenticated HTTP client for the QuantPlay account API
//! - MCP-facing tool functions and parameter schemas
//!
//! The adapter holds no state across calls: every query is fetched fresh
//! from the remote service, and the only process-wide value is the
//! immutable credential loaded at startup.

pub mod client;
pub mod config;
pub mod error;
pub mod tools;

/// Test utilities including the mock QuantPlay API server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use client::QuantplayClient;
pub use config::Config;
pub use error::{Error, Result};
