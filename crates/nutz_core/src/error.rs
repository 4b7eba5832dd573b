//! Error types for nutz core.

use nutz_storage::StorageError;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that a façade operation can end with.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An empty bucket name or key was supplied.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the rejected argument.
        message: String,
    },

    /// A strict walk hit a bucket that does not exist.
    #[error("namespace not found: {name:?} at position {position}")]
    NamespaceNotFound {
        /// Name of the missing bucket.
        name: String,
        /// Position of the missing bucket in the chain (0 is the root).
        position: usize,
    },

    /// The bucket chain exists but the key does not.
    #[error("key not found: {key:?}")]
    KeyNotFound {
        /// The key that was looked up.
        key: String,
    },

    /// The embedded engine failed (open, commit, or a primitive).
    #[error("engine failure: {0}")]
    Engine(#[from] StorageError),
}

/// Coarse classification of a [`CoreError`], for callers that branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`CoreError::InvalidArgument`].
    InvalidArgument,
    /// See [`CoreError::NamespaceNotFound`].
    NamespaceNotFound,
    /// See [`CoreError::KeyNotFound`].
    KeyNotFound,
    /// See [`CoreError::Engine`].
    EngineFailure,
}

impl CoreError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a namespace not found error.
    pub fn namespace_not_found(name: impl Into<String>, position: usize) -> Self {
        Self::NamespaceNotFound {
            name: name.into(),
            position,
        }
    }

    /// Creates a key not found error.
    pub fn key_not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound { key: key.into() }
    }

    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::NamespaceNotFound { .. } => ErrorKind::NamespaceNotFound,
            Self::KeyNotFound { .. } => ErrorKind::KeyNotFound,
            Self::Engine(_) => ErrorKind::EngineFailure,
        }
    }

    /// Returns true for [`CoreError::NamespaceNotFound`] and [`CoreError::KeyNotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NamespaceNotFound { .. } | Self::KeyNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(
            CoreError::invalid_argument("x").kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            CoreError::namespace_not_found("b", 1).kind(),
            ErrorKind::NamespaceNotFound
        );
        assert_eq!(CoreError::key_not_found("k").kind(), ErrorKind::KeyNotFound);
        assert_eq!(
            CoreError::from(StorageError::ReadOnly).kind(),
            ErrorKind::EngineFailure
        );
    }

    #[test]
    fn not_found_classification() {
        assert!(CoreError::key_not_found("k").is_not_found());
        assert!(CoreError::namespace_not_found("b", 0).is_not_found());
        assert!(!CoreError::invalid_argument("x").is_not_found());
    }

    #[test]
    fn messages_carry_details() {
        let err = CoreError::namespace_not_found("users", 2);
        assert_eq!(
            err.to_string(),
            "namespace not found: \"users\" at position 2"
        );
        assert_eq!(
            CoreError::key_not_found("k1").to_string(),
            "key not found: \"k1\""
        );
    }
}
