//! Server command implementation

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use quantplay_core::{Config, QuantplayClient};

pub async fn cmd_serve(host: &str, http_port: Option<u16>) -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    info!("Using QuantPlay endpoint {}", config.base_url);
    let client = Arc::new(QuantplayClient::new(&config)?);

    match http_port {
        Some(port) => {
            println!("🚀 Starting QuantPlay MCP server...");
            println!("   Endpoint: {}", config.base_url);
            println!("   Listening: http://{}:{}/mcp", host, port);
            println!();
            println!("   Press Ctrl+C to stop");

            quantplay_server::start_mcp_server(client, host, port).await
        }
        // stdio mode: stdout carries the protocol, so no banner here
        None => quantplay_server::serve_stdio(client).await,
    }
}
