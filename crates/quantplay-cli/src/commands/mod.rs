//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `query` - Direct API queries (accounts, positions, holdings)
//! - `serve` - MCP server command

pub mod query;
pub mod serve;

// Re-export command functions for main.rs
pub use query::*;
pub use serve::*;

use anyhow::{Context, Result};

use quantplay_core::{Config, QuantplayClient};

/// Build the API client from the process environment.
///
/// Fails before any command runs when the API key is missing.
pub fn open_client() -> Result<QuantplayClient> {
    let config = Config::from_env().context("Failed to load configuration")?;
    QuantplayClient::new(&config).context("Failed to initialize QuantPlay client")
}
