//! QuantPlay MCP Server
//!
//! Serves the QuantPlay account tools over the Model Context Protocol.
//! The heavy lifting (configuration, HTTP client, tool functions) lives in
//! `quantplay-core`; this crate owns the protocol surface and transports.

pub mod mcp;

pub use mcp::{serve_stdio, start_mcp_server, QuantplayMcpServer};
