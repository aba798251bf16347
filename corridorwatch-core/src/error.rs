use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid bounding box '{0}': {1}")]
    InvalidBoundingBox(String, String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Failure of a single provider call, classified for the retry policy
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("request timed out")]
    Timeout,
    #[error("I/O error: {0}")]
    Io(String),
    #[error("provider responded with HTTP {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ProviderError {
    /// Timeouts, transport failures and 5xx responses are worth another attempt.
    /// Client errors and bad payloads are not.
    pub fn is_retriable(&self) -> bool {
        match self {
            ProviderError::Timeout | ProviderError::Io(_) => true,
            ProviderError::Status(code) => (500..600).contains(code),
            ProviderError::Malformed(_) | ProviderError::InvalidRequest(_) => false,
        }
    }
}
