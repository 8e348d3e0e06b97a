use crate::connection::config::mask_password;
use thiserror::Error;

/// Boxed cause carried by [`ShardError::ConnectionError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum ShardError {
    #[error("Connection error for shard '{}': {source}", mask_password(.identifier))]
    ConnectionError {
        identifier: String,
        #[source]
        source: BoxError,
    },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Lock error: {0}")]
    LockError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl ShardError {
    /// Wraps a provider failure for `identifier`.
    pub fn connection(identifier: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::ConnectionError {
            identifier: identifier.into(),
            source: source.into(),
        }
    }

    /// Identifier of the shard that failed to open, if any.
    pub fn identifier(&self) -> Option<&str> {
        match self {
            Self::ConnectionError { identifier, .. } => Some(identifier),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ShardError>;

impl<T> From<std::sync::PoisonError<T>> for ShardError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::LockError(err.to_string())
    }
}

impl From<serde_json::Error> for ShardError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
