//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use clap::{Parser, Subcommand};

/// QuantPlay - trading-account tools for MCP hosts
#[derive(Parser)]
#[command(name = "quantplay")]
#[command(about = "MCP adapter for the QuantPlay trading-account API", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the MCP server
    Serve {
        /// Serve MCP over streamable HTTP on this port instead of stdio
        ///
        /// Without this flag the server speaks stdio, which is how MCP
        /// hosts such as Claude Desktop spawn tool processes.
        #[arg(long)]
        http_port: Option<u16>,

        /// Host to bind the HTTP transport to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// List broker accounts
    Accounts,

    /// List positions for an account
    Positions {
        /// Account nickname
        nickname: String,
    },

    /// List holdings for an account
    Holdings {
        /// Account nickname
        nickname: String,
    },
}
