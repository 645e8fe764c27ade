//! Error types and Result alias for the DealVista client

use thiserror::Error;

/// Main error type for the DealVista client
#[derive(Error, Debug)]
pub enum Error {
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Session expired")]
    SessionExpired,

    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Insufficient points: {0}")]
    InsufficientPoints(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl Error {
    /// Whether the caller should re-authenticate before retrying
    pub fn requires_login(&self) -> bool {
        matches!(self, Error::SessionExpired | Error::AuthenticationError(_))
    }
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::NetworkError(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidData(err.to_string())
    }
}
