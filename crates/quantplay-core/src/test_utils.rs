//! Test utilities for quantplay-core
//!
//! This module provides testing infrastructure including a mock QuantPlay
//! API server that can be used for development and integration tests.
//! The mock speaks the real envelope format (`{error, message, data}`),
//! enforces the `x-api-key` header, and records every request it sees so
//! tests can assert on request counts and credentials.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// API key accepted by the mock server.
pub const MOCK_API_KEY: &str = "qp-test-key";

/// Nickname that answers with a non-JSON body (decode-error path).
pub const CORRUPT_NICKNAME: &str = "corrupt-json";

/// Nickname that answers with an `error: true` envelope (API-error path).
pub const LOCKED_NICKNAME: &str = "locked";

/// One request observed by the mock server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request path with the nickname substituted in
    pub path: String,
    /// Value of the `x-api-key` header, if present
    pub api_key: Option<String>,
}

/// Accounts fixture served by `GET /accounts`.
pub fn account_fixtures() -> Vec<Value> {
    vec![
        json!({
            "broker": "zerodha",
            "username": "AB1234",
            "nickname": "zerodha-main",
            "expiry": "2026-03-31"
        }),
        json!({
            "broker": "dhan",
            "username": "CL5678",
            "nickname": "dhan-options",
            "expiry": "2026-03-31"
        }),
    ]
}

/// Positions fixture for a known nickname, empty for anything else.
pub fn position_fixtures(nickname: &str) -> Vec<Value> {
    match nickname {
        "zerodha-main" => vec![
            json!({
                "tradingsymbol": "SBIN",
                "exchange": "NSE",
                "quantity": 40,
                "average_price": 612.10,
                "pnl": 732.0
            }),
            json!({
                "tradingsymbol": "NIFTY24AUG24500CE",
                "exchange": "NFO",
                "quantity": -75,
                "average_price": 112.35,
                "pnl": 1432.5
            }),
        ],
        "dhan-options" => vec![json!({
            "tradingsymbol": "BANKNIFTY24AUG51000PE",
            "exchange": "NFO",
            "quantity": 30,
            "average_price": 301.20,
            "pnl": -210.75
        })],
        _ => vec![],
    }
}

/// Holdings fixture for a known nickname, empty for anything else.
pub fn holding_fixtures(nickname: &str) -> Vec<Value> {
    match nickname {
        "zerodha-main" => vec![
            json!({
                "tradingsymbol": "SBIN",
                "isin": "INE062A01020",
                "quantity": 40,
                "average_price": 612.10,
                "last_price": 795.40
            }),
            json!({
                "tradingsymbol": "INFY",
                "isin": "INE009A01021",
                "quantity": 12,
                "average_price": 1401.00,
                "last_price": 1688.25
            }),
        ],
        "dhan-options" => vec![json!({
            "tradingsymbol": "HDFCBANK",
            "isin": "INE040A01034",
            "quantity": 25,
            "average_price": 1520.55,
            "last_price": 1641.00
        })],
        _ => vec![],
    }
}

fn known_nickname(nickname: &str) -> bool {
    account_fixtures()
        .iter()
        .any(|a| a.get("nickname").and_then(Value::as_str) == Some(nickname))
}

struct MockState {
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockState {
    fn record(&self, path: String, headers: &HeaderMap) {
        let api_key = headers
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.requests
            .lock()
            .unwrap()
            .push(RecordedRequest { path, api_key });
    }
}

/// Mock QuantPlay API server for testing and development
pub struct MockQuantplayServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    state: Arc<MockState>,
}

impl MockQuantplayServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let state = Arc::new(MockState {
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/accounts", get(handle_accounts))
            .route("/accounts/:nickname/positions", get(handle_positions))
            .route("/accounts/:nickname/holdings", get(handle_holdings))
            .route("/execution/order/place", post(handle_place_order))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            state,
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// All requests observed so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Number of requests observed so far
    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockQuantplayServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn check_api_key(headers: &HeaderMap) -> Result<(), Response> {
    let provided = headers.get("x-api-key").and_then(|v| v.to_str().ok());
    if provided == Some(MOCK_API_KEY) {
        Ok(())
    } else {
        Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": true, "message": "Invalid API key provided"})),
        )
            .into_response())
    }
}

fn data_response(data: Value) -> Response {
    (
        StatusCode::OK,
        Json(json!({"error": false, "data": data})),
    )
        .into_response()
}

fn not_found_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": true, "message": "Account not found"})),
    )
        .into_response()
}

async fn handle_accounts(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.record("/accounts".to_string(), &headers);
    if let Err(rejection) = check_api_key(&headers) {
        return rejection;
    }
    data_response(Value::Array(account_fixtures()))
}

async fn handle_positions(
    State(state): State<Arc<MockState>>,
    Path(nickname): Path<String>,
    headers: HeaderMap,
) -> Response {
    state.record(format!("/accounts/{nickname}/positions"), &headers);
    if let Err(rejection) = check_api_key(&headers) {
        return rejection;
    }
    match nickname.as_str() {
        CORRUPT_NICKNAME => (StatusCode::OK, "<!-- not json -->").into_response(),
        LOCKED_NICKNAME => (
            StatusCode::OK,
            Json(json!({"error": true, "message": "Account is locked"})),
        )
            .into_response(),
        n if known_nickname(n) => data_response(Value::Array(position_fixtures(n))),
        _ => not_found_response(),
    }
}

async fn handle_holdings(
    State(state): State<Arc<MockState>>,
    Path(nickname): Path<String>,
    headers: HeaderMap,
) -> Response {
    state.record(format!("/accounts/{nickname}/holdings"), &headers);
    if let Err(rejection) = check_api_key(&headers) {
        return rejection;
    }
    match nickname.as_str() {
        CORRUPT_NICKNAME => (StatusCode::OK, "<!-- not json -->").into_response(),
        n if known_nickname(n) => data_response(Value::Array(holding_fixtures(n))),
        _ => not_found_response(),
    }
}

#[derive(Debug, Deserialize)]
struct PlaceOrderQuery {
    nickname: String,
}

async fn handle_place_order(
    State(state): State<Arc<MockState>>,
    Query(query): Query<PlaceOrderQuery>,
    headers: HeaderMap,
    Json(_order): Json<Value>,
) -> Response {
    state.record(
        format!("/execution/order/place?nickname={}", query.nickname),
        &headers,
    );
    if let Err(rejection) = check_api_key(&headers) {
        return rejection;
    }
    if known_nickname(&query.nickname) {
        data_response(json!({"order_id": "QP-100042"}))
    } else {
        not_found_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::QuantplayClient;
    use crate::config::Config;
    use crate::error::Error;

    fn client_for(server: &MockQuantplayServer) -> QuantplayClient {
        let config = Config::new(MOCK_API_KEY).with_base_url(server.url());
        QuantplayClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_get_accounts_returns_fixture_unchanged() {
        let server = MockQuantplayServer::start().await;
        let client = client_for(&server);

        let accounts = client.get_accounts().await.unwrap();
        assert_eq!(accounts.len(), account_fixtures().len());
        assert_eq!(accounts, account_fixtures());
    }

    #[tokio::test]
    async fn test_get_positions_sends_nickname_and_credential_once() {
        let server = MockQuantplayServer::start().await;
        let client = client_for(&server);

        let positions = client.get_positions("zerodha-main").await.unwrap();
        assert_eq!(positions, position_fixtures("zerodha-main"));

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/accounts/zerodha-main/positions");
        assert_eq!(requests[0].api_key.as_deref(), Some(MOCK_API_KEY));
    }

    #[tokio::test]
    async fn test_get_holdings_known_nickname() {
        let server = MockQuantplayServer::start().await;
        let client = client_for(&server);

        let holdings = client.get_holdings("dhan-options").await.unwrap();
        assert_eq!(holdings, holding_fixtures("dhan-options"));
    }

    #[tokio::test]
    async fn test_unknown_nickname_is_error_not_empty_success() {
        let server = MockQuantplayServer::start().await;
        let client = client_for(&server);

        let err = client.get_positions("no-such-account").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        let err = client.get_holdings("no-such-account").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_rejected_credential_surfaces_authentication_error() {
        let server = MockQuantplayServer::start().await;
        let config = Config::new("wrong-key").with_base_url(server.url());
        let client = QuantplayClient::new(&config).unwrap();

        let err = client.get_accounts().await.unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
    }

    #[tokio::test]
    async fn test_malformed_body_surfaces_parse_error() {
        let server = MockQuantplayServer::start().await;
        let client = client_for(&server);

        let err = client.get_positions(CORRUPT_NICKNAME).await.unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[tokio::test]
    async fn test_envelope_error_surfaces_api_error() {
        let server = MockQuantplayServer::start().await;
        let client = client_for(&server);

        let err = client.get_positions(LOCKED_NICKNAME).await.unwrap_err();
        match err {
            Error::Api { message, .. } => assert!(message.contains("locked")),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_concurrent_calls_do_not_interfere() {
        let server = MockQuantplayServer::start().await;
        let client = client_for(&server);

        let (accounts, positions) =
            tokio::join!(client.get_accounts(), client.get_positions("zerodha-main"));

        assert_eq!(accounts.unwrap(), account_fixtures());
        assert_eq!(positions.unwrap(), position_fixtures("zerodha-main"));
        assert_eq!(server.request_count(), 2);
    }

    #[tokio::test]
    async fn test_place_order_returns_order_id() {
        let server = MockQuantplayServer::start().await;
        let client = client_for(&server);

        let order = json!({
            "nickname": "zerodha-main",
            "tradingsymbol": "SBIN",
            "transaction_type": "BUY",
            "quantity": 1
        });
        let data = client.place_order(&order).await.unwrap();
        assert_eq!(data, json!({"order_id": "QP-100042"}));
    }

    #[tokio::test]
    async fn test_place_order_unknown_nickname() {
        let server = MockQuantplayServer::start().await;
        let client = client_for(&server);

        let order = json!({"nickname": "no-such-account", "quantity": 1});
        let err = client.place_order(&order).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
