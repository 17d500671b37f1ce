//! QuantPlay API client
//!
//! Authenticated HTTP access to the QuantPlay account service. Every call
//! is a single request: send, await, decode the `{error, message, data}`
//! envelope, return the unwrapped `data`. No retries, no caching; the
//! remote service is the source of truth for every query.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-api-key";

/// Client for the QuantPlay API.
///
/// Holds the credential immutably for the process lifetime. Cloning is
/// cheap and shares the underlying connection pool.
#[derive(Clone, Debug)]
pub struct QuantplayClient {
    http_client: Client,
    base_url: String,
    timeout_secs: u64,
}

/// Response wrapper used by every QuantPlay endpoint.
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    #[serde(default)]
    error: bool,
    message: Option<String>,
    data: Option<Value>,
}

impl QuantplayClient {
    /// Create a new client from the given configuration.
    pub fn new(config: &Config) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(Error::Authentication("Invalid API key provided".into()));
        }

        let mut api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| Error::Authentication("Invalid API key provided".into()))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);

        let http_client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {e}")))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        debug!("Initialized QuantPlay API client with base URL: {base_url}");

        Ok(Self {
            http_client,
            base_url,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Create a client from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::new(&Config::from_env()?)
    }

    /// Fetch all broker accounts for the user.
    pub async fn get_accounts(&self) -> Result<Vec<Value>> {
        self.get_list("/accounts".to_string()).await
    }

    /// Fetch positions for the account with the given nickname.
    ///
    /// The nickname must be non-empty; whether it names an existing account
    /// is validated remotely.
    pub async fn get_positions(&self, nickname: &str) -> Result<Vec<Value>> {
        let nickname = validate_nickname(nickname)?;
        self.get_list(format!("/accounts/{nickname}/positions")).await
    }

    /// Fetch holdings for the account with the given nickname.
    pub async fn get_holdings(&self, nickname: &str) -> Result<Vec<Value>> {
        let nickname = validate_nickname(nickname)?;
        self.get_list(format!("/accounts/{nickname}/holdings")).await
    }

    /// Place an order.
    ///
    /// The order object must carry the target account's `nickname`.
    /// Returns the order id assigned by the remote service.
    pub async fn place_order(&self, order: &Value) -> Result<Value> {
        let nickname = order
            .get("nickname")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| Error::InvalidNickname("order must carry a nickname".into()))?;

        let url = self.build_url(&format!("/execution/order/place?nickname={nickname}"));
        debug!("POST {url}");

        let response = self
            .http_client
            .post(&url)
            .json(order)
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        self.handle_response(response).await
    }

    async fn get_list(&self, endpoint: String) -> Result<Vec<Value>> {
        let url = self.build_url(&endpoint);
        debug!("GET {url}");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        match self.handle_response(response).await? {
            Value::Array(items) => Ok(items),
            other => Err(Error::Parse(format!(
                "expected a JSON array in the data field, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Build a full URL for an API endpoint path.
    fn build_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    /// Check the status, decode the envelope, and unwrap its `data`.
    async fn handle_response(&self, response: Response) -> Result<Value> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        if !status.is_success() {
            let message = extract_error_message(&body);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Authentication(message),
                StatusCode::NOT_FOUND => Error::NotFound(message),
                _ => Error::Api {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        let envelope: ApiEnvelope =
            serde_json::from_str(&body).map_err(|e| Error::Parse(e.to_string()))?;

        if envelope.error {
            return Err(Error::Api {
                status: status.as_u16(),
                message: envelope
                    .message
                    .unwrap_or_else(|| "Unknown error".to_string()),
            });
        }

        envelope
            .data
            .ok_or_else(|| Error::Parse("response envelope has no data field".to_string()))
    }

    fn classify_transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout(self.timeout_secs)
        } else {
            Error::Network(err.to_string())
        }
    }
}

fn validate_nickname(nickname: &str) -> Result<&str> {
    let trimmed = nickname.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidNickname("nickname must not be empty".into()));
    }
    Ok(trimmed)
}

/// Pull a `message` out of an error body, falling back to the raw text.
fn extract_error_message(body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        if let Some(message) = map.get("message").and_then(Value::as_str) {
            return message.to_string();
        }
    }
    if body.trim().is_empty() {
        "Unknown error".to_string()
    } else {
        body.trim().to_string()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
