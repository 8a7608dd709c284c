//! Error types for mapping operations.

use thiserror::Error;

/// Errors from the learned-mapping store and its durable backing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("mapping repository failed to {operation}: {message}")]
    Repository {
        operation: &'static str,
        message: String,
    },
    #[error("mapping repository lock poisoned")]
    LockPoisoned,
}

impl MapError {
    pub fn repository(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Repository {
            operation,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MapError>;
