//! Error types shared by the PredictPIX crates

use thiserror::Error;

/// Crate-wide error type for backend and domain failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PredictError {
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PredictError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        PredictError::Api {
            status,
            message: message.into(),
        }
    }

    pub fn network(msg: impl Into<String>) -> Self {
        PredictError::Network(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        PredictError::Auth(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        PredictError::Parse(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        PredictError::NotFound(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        PredictError::Config(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        PredictError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        PredictError::Internal(msg.into())
    }

    /// The message shown to the user in a blocking alert.
    ///
    /// This is the bare message carried by the error, without the
    /// variant prefix used by `Display`.
    pub fn user_message(&self) -> &str {
        match self {
            PredictError::Api { message, .. } => message,
            PredictError::Network(msg)
            | PredictError::Auth(msg)
            | PredictError::Parse(msg)
            | PredictError::NotFound(msg)
            | PredictError::Config(msg)
            | PredictError::Validation(msg)
            | PredictError::Internal(msg) => msg,
        }
    }

    /// Whether retrying the same request could succeed
    pub fn is_retriable(&self) -> bool {
        match self {
            PredictError::Network(_) => true,
            PredictError::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

/// Result type alias for PredictPIX operations
pub type PredictResult<T> = Result<T, PredictError>;
