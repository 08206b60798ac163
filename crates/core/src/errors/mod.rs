//! Error types and Result alias for the GameLayer dashboard

use thiserror::Error;

/// Generic notice shown when the transport itself failed
pub const NETWORK_FAILURE_NOTICE: &str = "Network error, please try again";

/// Generic notice shown when the server answered with something we cannot read
pub const UNEXPECTED_RESPONSE_NOTICE: &str = "Unexpected response from server";

/// Main error type for the GameLayer dashboard
#[derive(Error, Debug)]
pub enum Error {
    /// The request never produced an HTTP response (DNS, TLS, timeout, ...)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Non-2xx response whose JSON body could be read
    #[error("API request failed ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// Response body was not the JSON we expected (raw text goes to the log only)
    #[error("Unexpected response from server (HTTP {status})")]
    UnexpectedResponse { status: u16 },

    /// Business-rule rejection reported by the platform (e.g. insufficient credits)
    #[error("Request rejected (code {code}): {message}")]
    Rejected { code: i64, message: String },

    /// Another request for the same entity is still in flight
    #[error("A request for {0} is already in progress")]
    Busy(String),

    #[error("{0}")]
    NotCompletable(String),

    #[error("{0}")]
    NotAvailable(String),

    #[error("No credentials configured: {0}")]
    MissingCredentials(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Encryption error: {0}")]
    EncryptionError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// Text to put in front of the user for this failure.
    ///
    /// Server-provided messages are returned verbatim; transport and
    /// decoding failures collapse to a generic notice.
    pub fn user_message(&self) -> String {
        match self {
            Error::NetworkError(_) => NETWORK_FAILURE_NOTICE.to_string(),
            Error::UnexpectedResponse { .. } => UNEXPECTED_RESPONSE_NOTICE.to_string(),
            Error::ApiError { message, .. } => message.clone(),
            Error::Rejected { message, .. } => message.clone(),
            Error::NotCompletable(msg) | Error::NotAvailable(msg) | Error::InvalidData(msg) => {
                msg.clone()
            }
            other => other.to_string(),
        }
    }

    /// True for business-rule rejections that must suppress optimistic UI
    pub fn is_rejection(&self) -> bool {
        matches!(self, Error::Rejected { .. })
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
