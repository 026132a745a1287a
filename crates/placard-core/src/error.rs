//! Error types for placard-core.
//!
//! The taxonomy mirrors what an authorization boundary needs to tell apart:
//! a missing object (404), a refused caller (403), a malformed request (400)
//! and a lost optimistic-concurrency race (409).

use std::path::{Path, PathBuf};

/// Errors that can occur across the Placard crates.
///
/// All error variants are marked with `#[non_exhaustive]` to allow
/// adding new error types without breaking changes.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The requested object (ACL, advertisement, ...) does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// What kind of object was looked up
        kind: String,
        /// Identifier that was not found
        id: String,
    },

    /// The caller holds no permission that satisfies the request.
    #[error("Access denied: {message}")]
    AccessDenied {
        /// Human-readable reason
        message: String,
    },

    /// The request is malformed or inconsistent.
    #[error("Bad request: {message}")]
    BadRequest {
        /// Field or aspect that failed validation
        field: Option<String>,
        /// What went wrong
        message: String,
    },

    /// An object with the same identity already exists.
    #[error("{kind} already exists: {id}")]
    AlreadyExists {
        /// What kind of object collided
        kind: String,
        /// Identifier of the existing object
        id: String,
    },

    /// A write was based on a stale version of the object.
    #[error("Conflict on {kind} {id}: expected version {expected}, found {found}")]
    Conflict {
        /// What kind of object was written
        kind: String,
        /// Identifier of the object
        id: String,
        /// Version the writer read
        expected: u64,
        /// Version currently stored
        found: u64,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// I/O error tied to a file path
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience `Result` type alias for Placard operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a not-found error for an object of the given kind.
    pub fn not_found<K, I>(kind: K, id: I) -> Self
    where
        K: Into<String>,
        I: ToString,
    {
        Error::NotFound {
            kind: kind.into(),
            id: id.to_string(),
        }
    }

    /// Creates an access-denied error.
    pub fn access_denied<S: Into<String>>(message: S) -> Self {
        Error::AccessDenied {
            message: message.into(),
        }
    }

    /// Creates a bad-request error.
    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        Error::BadRequest {
            field: None,
            message: message.into(),
        }
    }

    /// Creates a bad-request error naming the offending field.
    pub fn bad_request_field<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::BadRequest {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates an already-exists error.
    pub fn already_exists<K, I>(kind: K, id: I) -> Self
    where
        K: Into<String>,
        I: ToString,
    {
        Error::AlreadyExists {
            kind: kind.into(),
            id: id.to_string(),
        }
    }

    /// Creates a version conflict error.
    pub fn conflict<K, I>(kind: K, id: I, expected: u64, found: u64) -> Self
    where
        K: Into<String>,
        I: ToString,
    {
        Error::Conflict {
            kind: kind.into(),
            id: id.to_string(),
            expected,
            found,
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Wraps an I/O error with the path it happened on.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether the caller can fix this error by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::NotFound { .. }
                | Error::AccessDenied { .. }
                | Error::BadRequest { .. }
                | Error::AlreadyExists { .. }
                | Error::Conflict { .. }
        )
    }

    /// Returns `true` for [`Error::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Returns `true` for [`Error::AccessDenied`].
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Error::AccessDenied { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = Error::not_found("acl", "advertisement:42");
        assert_eq!(err.to_string(), "acl not found: advertisement:42");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_access_denied_display() {
        let err = Error::access_denied("no matching ACE");
        assert_eq!(err.to_string(), "Access denied: no matching ACE");
        assert!(err.is_access_denied());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_bad_request_with_field() {
        let err = Error::bad_request_field("permissions", "must not be empty");
        let Error::BadRequest { field, message } = err else {
            unreachable!("Expected BadRequest error variant");
        };
        assert_eq!(field, Some("permissions".to_string()));
        assert_eq!(message, "must not be empty");
    }

    #[test]
    fn test_conflict_display() {
        let err = Error::conflict("acl", "advertisement:1", 3, 4);
        assert_eq!(
            err.to_string(),
            "Conflict on acl advertisement:1: expected version 3, found 4"
        );
    }

    #[test]
    fn test_client_error_classification() {
        assert!(Error::not_found("acl", 1).is_client_error());
        assert!(Error::access_denied("x").is_client_error());
        assert!(Error::bad_request("x").is_client_error());
        assert!(Error::conflict("acl", 1, 0, 1).is_client_error());
        assert!(!Error::config("broken").is_client_error());
    }

    #[test]
    fn test_io_with_path_display() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = Error::io_with_path(source, "/tmp/state.json");
        assert!(err.to_string().contains("/tmp/state.json"));
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_serde_error_conversion() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err();
        let err: Error = serde_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_error_implements_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
