//! Error handling for the stock ledger client

use thiserror::Error;

/// Errors surfaced by the gateway and the ledger store.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network or HTTP-level failure before a response body was obtained.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The gateway answered with a non-success status. Server-side
    /// validation failures land here; the client validates nothing itself.
    #[error("gateway error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("failed to decode gateway response: {0}")]
    Decode(String),

    #[error("configuration error: {0}")]
    Configuration(#[from] config::ConfigError),
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
