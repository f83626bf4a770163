//! Error types and handling.

use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status code
    #[error("Remote error ({status}): {message}")]
    Remote { status: u16, message: String },

    /// Response decoded but reported `success: false`
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Response is missing a field the caller relies on
    #[error("Incomplete response: missing `{0}`")]
    MissingField(&'static str),

    /// Data parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Action is not allowed in the current wizard state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Background request panicked or was cancelled before reporting back
    #[error("Task failed: {0}")]
    Task(String),
}

/// Result type alias for AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Create a parse error with message
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a validation error with message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an invalid state error with message
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Whether the error comes from an incomplete or rejected payload
    /// rather than a transport failure.
    ///
    /// Controllers treat these as silent no-ops for the user.
    pub fn is_partial_data(&self) -> bool {
        matches!(self, Self::Rejected(_) | Self::MissingField(_))
    }
}
