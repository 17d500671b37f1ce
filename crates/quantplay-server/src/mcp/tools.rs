//! MCP Tool implementations for QuantPlay
//!
//! Re-exports from quantplay_core::tools for MCP server use.
//! The actual implementations live in quantplay-core so they can be shared
//! with the CLI's direct query commands.

// Re-export all tool types and functions from quantplay-core
pub use quantplay_core::tools::{
    // Functions
    get_accounts,
    get_holdings,
    get_positions,
    // Params types
    GetHoldingsParams,
    GetPositionsParams,
};
