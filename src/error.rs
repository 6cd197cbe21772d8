//! Error types for user factory operations.
//!
//! Lookups that find nothing are not errors: they resolve to `None`. The
//! variants below cover inputs the factory cannot handle, class names it
//! cannot build, and failures reported by the underlying store.

/// Main error type for user factory operations.
#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    /// The input has a shape the factory does not accept
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The class resolver produced a name with no registered constructor
    #[error("Unknown user class '{class_name}'")]
    UnknownClass { class_name: String },

    /// Factory configuration is unusable
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// Errors from the user store, forwarded unchanged
    #[error("User store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl FactoryError {
    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create the error raised for an input type the factory cannot resolve.
    pub fn unsupported_input(type_name: impl AsRef<str>) -> Self {
        Self::invalid_argument(format!(
            "expected a user id, user record, user object, query criteria or user query, got {}",
            type_name.as_ref()
        ))
    }

    /// Create an unknown class error.
    pub fn unknown_class(class_name: impl Into<String>) -> Self {
        Self::UnknownClass {
            class_name: class_name.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Wrap a store error.
    pub fn store<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Store(Box::new(error))
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}

/// Result type for user factory operations.
pub type FactoryResult<T> = Result<T, FactoryError>;
