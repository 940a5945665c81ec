//! Unified error types for Pantry.
//!
//! Validation failures are deterministic given the same inputs and are never
//! retried. Persistence failures are surfaced to the caller by default; the
//! remote backend's read paths may instead degrade to "absent" through the
//! [`FailOpen`] helpers, logging a warning rather than failing the lookup.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Pantry operations.
#[derive(Error, Debug)]
pub enum PantryError {
    /// A creation payload failed shape, type, or uniqueness checks.
    #[error("Invalid Object: {reason}")]
    InvalidObject { reason: String },

    /// An update payload failed shape, type, or property checks.
    #[error("Invalid Update Object: {reason}")]
    InvalidUpdateObject { reason: String },

    /// An operation addressed a name that is not in the list.
    #[error("no item named {name}")]
    NotFound { name: String },

    /// I/O errors from the file-backed store.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Remote table errors (transport or unexpected response).
    #[error("remote error: {message}")]
    Remote { message: String },

    /// JSON parsing/serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },
}

/// A specialized Result type for Pantry operations.
pub type Result<T> = std::result::Result<T, PantryError>;

impl PantryError {
    /// Create an invalid-object error for a rejected creation payload.
    pub fn invalid_object(reason: impl Into<String>) -> Self {
        Self::InvalidObject {
            reason: reason.into(),
        }
    }

    /// Create an invalid-update-object error for a rejected update payload.
    pub fn invalid_update(reason: impl Into<String>) -> Self {
        Self::InvalidUpdateObject {
            reason: reason.into(),
        }
    }

    /// Create a not-found error for an absent item name.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a remote table error.
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Check if this error is a validation rejection.
    ///
    /// Validation rejections are reported to the caller and never treated as
    /// infrastructure failures.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidObject { .. } | Self::InvalidUpdateObject { .. }
        )
    }
}

impl From<io::Error> for PantryError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for PantryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for PantryError {
    fn from(err: reqwest::Error) -> Self {
        Self::Remote {
            message: err.to_string(),
        }
    }
}

/// Trait for fail-open error handling on read paths.
///
/// The remote backend's lookups are specified to degrade to "absent" when the
/// table is unreachable. These helpers log the error through `tracing` and
/// return the fallback instead of propagating.
pub trait FailOpen<T> {
    /// Handle an error by logging a warning and returning the default value.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;

    /// Handle an error by logging a warning and returning the provided fallback.
    fn fail_open_with(self, context: &str, fallback: T) -> T;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using default)", context, err);
                T::default()
            }
        }
    }

    fn fail_open_with(self, context: &str, fallback: T) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using fallback)", context, err);
                fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_object_display() {
        let err = PantryError::invalid_object("quantity must be an integer");
        assert_eq!(
            err.to_string(),
            "Invalid Object: quantity must be an integer"
        );
    }

    #[test]
    fn test_invalid_update_display() {
        let err = PantryError::invalid_update("unknown property");
        assert_eq!(err.to_string(), "Invalid Update Object: unknown property");
    }

    #[test]
    fn test_not_found_display() {
        let err = PantryError::not_found("apple");
        assert_eq!(err.to_string(), "no item named apple");
    }

    #[test]
    fn test_storage_error_display() {
        let err = PantryError::storage(
            "/tmp/groceries.json",
            io::Error::new(io::ErrorKind::NotFound, "file not found"),
        );
        assert!(err.to_string().contains("storage error"));
        assert!(err.to_string().contains("/tmp/groceries.json"));
    }

    #[test]
    fn test_remote_error_display() {
        let err = PantryError::remote("connection refused");
        assert_eq!(err.to_string(), "remote error: connection refused");
    }

    #[test]
    fn test_is_validation() {
        assert!(PantryError::invalid_object("x").is_validation());
        assert!(PantryError::invalid_update("x").is_validation());
        assert!(!PantryError::not_found("apple").is_validation());
        assert!(!PantryError::remote("x").is_validation());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err: PantryError = io_err.into();
        assert!(matches!(err, PantryError::Storage { .. }));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: PantryError = json_err.into();
        assert!(matches!(err, PantryError::Serde { .. }));
    }

    #[test]
    fn test_fail_open_default() {
        let result: Result<Vec<String>> = Err(PantryError::remote("down"));
        let value = result.fail_open_default("listing items");
        assert!(value.is_empty());
    }

    #[test]
    fn test_fail_open_with() {
        let result: Result<Option<i32>> = Err(PantryError::remote("down"));
        let value = result.fail_open_with("fetching item", None);
        assert!(value.is_none());
    }

    #[test]
    fn test_fail_open_success_passthrough() {
        let result: Result<i32> = Ok(100);
        assert_eq!(result.fail_open_default("context"), 100);
    }
}
