//! Error types for the AO client

use thiserror::Error;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("wallet error: {0}")]
    Wallet(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("gateway returned status {status} for {url}")]
    Gateway { status: u16, url: String },

    #[error("remote response missing field: {0}")]
    MissingField(&'static str),
}
