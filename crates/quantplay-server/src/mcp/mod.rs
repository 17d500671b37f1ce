//! MCP (Model Context Protocol) Server for QuantPlay
//!
//! Exposes the QuantPlay trading-account API to LLMs via MCP tools.
//! All tools are read-only - no order placement through MCP.
//!
//! # Architecture
//!
//! The server speaks stdio by default, which is how MCP hosts (Claude
//! Desktop and friends) spawn tool processes. A streamable-HTTP transport
//! is available for network access.
//!
//! # Example
//!
//! ```bash
//! # stdio, for an MCP host's server configuration
//! quantplay serve
//!
//! # streamable HTTP on a local port
//! quantplay serve --http-port 3001
//! ```
//!
//! # Available Tools
//!
//! - `get_accounts` - All broker accounts for the user
//! - `get_positions` - Positions for one account, looked up by nickname
//! - `get_holdings` - Holdings for one account, looked up by nickname

mod tools;

use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router, transport::stdio, ErrorData as McpError, ServerHandler,
    ServiceExt,
};
use serde_json::Value;
use tracing::info;

use quantplay_core::{Error, QuantplayClient};

pub use tools::*;

/// QuantPlay MCP server state
#[derive(Clone)]
pub struct QuantplayMcpServer {
    /// Shared API client; the credential inside is loaded once at startup
    client: Arc<QuantplayClient>,
    /// Tool router for MCP operations
    tool_router: ToolRouter<Self>,
}

impl QuantplayMcpServer {
    /// Create a new MCP server around the given API client
    pub fn new(client: Arc<QuantplayClient>) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_handler]
impl ServerHandler for QuantplayMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "quantplay".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("QuantPlay Trading Accounts".to_string()),
                website_url: Some("https://github.com/quantplay-tech/quantplay-mcp".to_string()),
                icons: None,
            },
            instructions: Some(
                "QuantPlay exposes the user's broker trading accounts. Use get_accounts \
                 to list accounts, then pass an account's nickname to get_positions or \
                 get_holdings to inspect it. All tools are read-only."
                    .to_string(),
            ),
        }
    }
}

#[tool_router]
impl QuantplayMcpServer {
    /// Get all broker accounts for the user
    #[tool(
        description = "Get all broker accounts for the user. Returns account records with broker, username, nickname, and expiry."
    )]
    async fn get_accounts(&self) -> Result<CallToolResult, McpError> {
        match tools::get_accounts(&self.client).await {
            Ok(accounts) => Ok(json_result(&accounts)),
            Err(e) => Err(tool_error(e)),
        }
    }

    /// Get positions for a given account nickname
    #[tool(
        description = "Get positions for the account with the given nickname. Returns a list of position records."
    )]
    async fn get_positions(
        &self,
        Parameters(params): Parameters<GetPositionsParams>,
    ) -> Result<CallToolResult, McpError> {
        match tools::get_positions(&self.client, params).await {
            Ok(positions) => Ok(json_result(&positions)),
            Err(e) => Err(tool_error(e)),
        }
    }

    /// Get holdings for a given account nickname
    #[tool(
        description = "Get holdings for the account with the given nickname. Returns a list of holding records."
    )]
    async fn get_holdings(
        &self,
        Parameters(params): Parameters<GetHoldingsParams>,
    ) -> Result<CallToolResult, McpError> {
        match tools::get_holdings(&self.client, params).await {
            Ok(holdings) => Ok(json_result(&holdings)),
            Err(e) => Err(tool_error(e)),
        }
    }
}

fn json_result(records: &[Value]) -> CallToolResult {
    CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(records).unwrap_or_default(),
    )])
}

/// Map an adapter error to an MCP tool failure.
///
/// Every failure stays per-call; the process keeps serving.
fn tool_error(err: Error) -> McpError {
    match err {
        Error::InvalidNickname(_) => McpError::invalid_params(err.to_string(), None),
        _ => McpError::internal_error(err.to_string(), None),
    }
}

/// Serve MCP over stdio until the host closes the session
pub async fn serve_stdio(client: Arc<QuantplayClient>) -> anyhow::Result<()> {
    info!("Starting MCP server on stdio");

    let service = QuantplayMcpServer::new(client).serve(stdio()).await?;
    service.waiting().await?;

    Ok(())
}

/// Start the MCP server over streamable HTTP on the given port
pub async fn start_mcp_server(
    client: Arc<QuantplayClient>,
    host: &str,
    port: u16,
) -> anyhow::Result<()> {
    use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
    use rmcp::transport::streamable_http_server::StreamableHttpService;

    info!("Starting MCP server at http://{}:{}/mcp", host, port);

    let service = StreamableHttpService::new(
        move || Ok(QuantplayMcpServer::new(client.clone())),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    let router = axum::Router::new().nest_service("/mcp", service);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("MCP server ready at http://{}/mcp", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            // Wait for shutdown signal
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quantplay_core::test_utils::{MockQuantplayServer, MOCK_API_KEY};
    use quantplay_core::Config;
    use rmcp::model::ErrorCode;

    fn server_for(mock: &MockQuantplayServer) -> QuantplayMcpServer {
        let config = Config::new(MOCK_API_KEY).with_base_url(mock.url());
        QuantplayMcpServer::new(Arc::new(QuantplayClient::new(&config).unwrap()))
    }

    #[test]
    fn test_get_info_advertises_tools() {
        let config = Config::new(MOCK_API_KEY);
        let server = QuantplayMcpServer::new(Arc::new(QuantplayClient::new(&config).unwrap()));

        let info = server.get_info();
        assert_eq!(info.server_info.name, "quantplay");
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.is_some());
    }

    #[tokio::test]
    async fn test_get_accounts_tool_succeeds() {
        let mock = MockQuantplayServer::start().await;
        let server = server_for(&mock);

        let result = server.get_accounts().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_get_positions_tool_unknown_nickname_is_error() {
        let mock = MockQuantplayServer::start().await;
        let server = server_for(&mock);

        let err = server
            .get_positions(Parameters(GetPositionsParams {
                nickname: "no-such-account".to_string(),
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
        assert!(err.message.contains("Not found"));
    }

    #[tokio::test]
    async fn test_get_holdings_tool_empty_nickname_is_invalid_params() {
        let mock = MockQuantplayServer::start().await;
        let server = server_for(&mock);

        let err = server
            .get_holdings(Parameters(GetHoldingsParams {
                nickname: String::new(),
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        // Local validation: the mock must never see the request.
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_tool_errors_do_not_poison_the_server() {
        let mock = MockQuantplayServer::start().await;
        let server = server_for(&mock);

        let _ = server
            .get_positions(Parameters(GetPositionsParams {
                nickname: "no-such-account".to_string(),
            }))
            .await;

        // A per-call failure leaves the server fully usable.
        assert!(server.get_accounts().await.is_ok());
    }
}
