//! MCP Tool implementations for QuantPlay
//!
//! These tools wrap the API client for LLM invocation. All of them are
//! read-only queries; order placement is deliberately not exposed here.
//! They are used by:
//! 1. The MCP server for external LLM clients (Claude Desktop, etc.)
//! 2. The CLI for direct one-shot queries

use serde::Deserialize;
use serde_json::Value;

use crate::client::QuantplayClient;
use crate::error::Result;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetPositionsParams {
    /// Account nickname to look up
    #[schemars(description = "Nickname of the account to fetch positions for")]
    pub nickname: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetHoldingsParams {
    /// Account nickname to look up
    #[schemars(description = "Nickname of the account to fetch holdings for")]
    pub nickname: String,
}

/// Get all broker accounts for the user.
pub async fn get_accounts(client: &QuantplayClient) -> Result<Vec<Value>> {
    client.get_accounts().await
}

/// Get positions for the account named by `params.nickname`.
pub async fn get_positions(
    client: &QuantplayClient,
    params: GetPositionsParams,
) -> Result<Vec<Value>> {
    client.get_positions(&params.nickname).await
}

/// Get holdings for the account named by `params.nickname`.
pub async fn get_holdings(
    client: &QuantplayClient,
    params: GetHoldingsParams,
) -> Result<Vec<Value>> {
    client.get_holdings(&params.nickname).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::Error;

    #[tokio::test]
    async fn test_get_positions_empty_nickname_is_deterministic_error() {
        // Unroutable endpoint: the error must come from local validation,
        // never from the network.
        let config = Config::new("qp-test-key").with_base_url("http://127.0.0.1:9/v2");
        let client = QuantplayClient::new(&config).unwrap();

        let err = get_positions(
            &client,
            GetPositionsParams {
                nickname: String::new(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::InvalidNickname(_)));

        let err = get_holdings(
            &client,
            GetHoldingsParams {
                nickname: "  ".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::InvalidNickname(_)));
    }
}
