//! Configuration for the QuantPlay API client
//!
//! All settings come from the process environment; a `.env` file next to
//! the working directory is honored. Only the API key is required.

use std::env;

use tracing::debug;

use crate::error::{Error, Result};

/// Base URL of the public QuantPlay deployment.
pub const API_BASE_URL: &str = "https://dms.quantplay.tech";

/// API version prefix appended to the base URL.
pub const API_VERSION: &str = "v2";

/// Request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding the API key (required).
pub const API_KEY_VAR: &str = "QUANTPLAY_API_KEY";

/// Environment variable overriding the API endpoint (optional).
pub const BASE_URL_VAR: &str = "QUANTPLAY_BASE_URL";

/// Environment variable overriding the request timeout (optional).
pub const TIMEOUT_VAR: &str = "QUANTPLAY_TIMEOUT_SECS";

/// Client configuration, resolved once at process start.
///
/// The API key is immutable for the process lifetime and is never logged
/// or persisted.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key sent as the `x-api-key` header on every request
    pub api_key: String,
    /// Endpoint including the version prefix, e.g. `https://dms.quantplay.tech/v2`
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Config {
    /// Build a configuration with the default endpoint and timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Resolve configuration from the process environment.
    ///
    /// Fails with a configuration error when `QUANTPLAY_API_KEY` is missing
    /// or empty; the process must not serve any tool in that case.
    pub fn from_env() -> Result<Self> {
        match dotenv::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) => debug!("No .env file loaded: {e}"),
        }

        let api_key = env::var(API_KEY_VAR)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                Error::Config(format!("{API_KEY_VAR} environment variable is required"))
            })?;

        let base_url = env::var(BASE_URL_VAR)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(default_base_url);

        let timeout_secs = match env::var(TIMEOUT_VAR) {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!("{TIMEOUT_VAR} must be a whole number of seconds"))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key,
            base_url,
            timeout_secs,
        })
    }

    /// Override the endpoint, e.g. to point at a mock server in tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

fn default_base_url() -> String {
    format!("{API_BASE_URL}/{API_VERSION}")
}
