//! Store-specific error types.
//!
//! These errors describe failures inside a user store. The factory never
//! inspects them; it boxes and forwards them as
//! [`FactoryError::Store`](crate::error::FactoryError::Store).

use thiserror::Error;

/// Errors raised by [`InMemoryUserStore`](super::InMemoryUserStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Invalid query criteria '{key}': {message}")]
    InvalidCriteria {
        /// The criteria key that was rejected
        key: String,
        /// Why it was rejected
        message: String,
    },

    #[error("A user with login '{login}' already exists")]
    DuplicateLogin {
        /// The conflicting login
        login: String,
    },

    #[error("Internal store error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

impl StoreError {
    /// Create an invalid criteria error.
    pub fn invalid_criteria(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidCriteria {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
