// Domain errors - Error types for the domain layer

use thiserror::Error;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// Invalid arguments provided
    #[error("Bad arguments: {0}")]
    BadArgs(String),
    /// A mandatory field is absent from a document
    #[error("Missing field: {0}")]
    MissingField(String),
    /// Document or value could not be parsed
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    /// Network request failed
    #[error("Transport failure: {0}")]
    TransportFail(String),
    /// File system operation failed
    #[error("File system failure: {0}")]
    FsFail(String),
    /// Operation is not offered by this component
    #[error("Not supported: {0}")]
    Unsupported(String),
    /// User input stream ended
    #[error("Input closed")]
    InputClosed,
    /// External program failed
    #[error("External tool failure: {0}")]
    ToolFail(String),
}

impl DomainError {
    /// Whether the error came from talking to a remote service
    pub fn is_transport(&self) -> bool {
        matches!(self, DomainError::TransportFail(_))
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::FsFail(err.to_string())
    }
}
