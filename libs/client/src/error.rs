//! Error types for the API client

use reqwest::StatusCode;
use thiserror::Error;

/// Custom error type for API calls
#[derive(Error, Debug)]
pub enum ClientError {
    /// The server rejected the bearer token, or there was none
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The server answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    /// The request never produced a usable response
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The configured API URL cannot take path segments
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// The token store could not be read or written
    #[error("Token store error: {0}")]
    TokenStore(String),

    /// The request was superseded before it completed
    #[error("Request cancelled")]
    Cancelled,

    /// Input rejected before any request was made
    #[error("{0}")]
    Validation(String),
}

impl ClientError {
    /// Message to show next to the control that triggered the call. Server
    /// and validation messages are shown as-is; anything else becomes
    /// `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Api { message, .. } | ClientError::Unauthorized(message)
                if !message.is_empty() =>
            {
                message.clone()
            }
            ClientError::Validation(message) => message.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_))
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Unauthorized(_) => Some(StatusCode::UNAUTHORIZED),
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status(),
            _ => None,
        }
    }
}

/// Type alias for client results
pub type ClientResult<T> = Result<T, ClientError>;
