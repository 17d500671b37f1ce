//! Error types for the QuantPlay adapter

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API request failed: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Network error occurred while connecting to QuantPlay API: {0}")]
    Network(String),

    #[error("Request to QuantPlay API timed out after {0} seconds")]
    Timeout(u64),

    #[error("Failed to parse API response: {0}")]
    Parse(String),

    #[error("Invalid nickname: {0}")]
    InvalidNickname(String),
}

pub type Result<T> = std::result::Result<T, Error>;
