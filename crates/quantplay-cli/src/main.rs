//! QuantPlay CLI - MCP adapter for the QuantPlay trading-account API
//!
//! Usage:
//!   quantplay serve                 Start the MCP server on stdio
//!   quantplay serve --http-port P   Serve MCP over streamable HTTP
//!   quantplay accounts              List broker accounts
//!   quantplay positions NICKNAME    List positions for an account
//!   quantplay holdings NICKNAME     List holdings for an account

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // stdout belongs to the MCP transport in stdio mode; logs go to stderr
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Serve { http_port, host } => commands::cmd_serve(&host, http_port).await,
        Commands::Accounts => {
            let client = commands::open_client()?;
            commands::cmd_accounts(&client).await
        }
        Commands::Positions { nickname } => {
            let client = commands::open_client()?;
            commands::cmd_positions(&client, &nickname).await
        }
        Commands::Holdings { nickname } => {
            let client = commands::open_client()?;
            commands::cmd_holdings(&client, &nickname).await
        }
    }
}
