//! Error handling module for cutsel

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for cutsel operations
#[derive(Error, Debug)]
pub enum CutselError {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input file or directory not found
    #[error("Input path not found: {path}")]
    InputNotFound { path: String },

    /// Range selection that cannot be evaluated
    #[error("Invalid selection '{input}': {reason}")]
    InvalidRange { input: String, reason: String },

    /// Failure below the application layer
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CutselError {
    pub fn config(message: impl Into<String>) -> Self {
        CutselError::Config {
            message: message.into(),
        }
    }
}

/// Result type alias for cutsel operations
pub type CutselResult<T> = std::result::Result<T, CutselError>;
