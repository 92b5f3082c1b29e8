//! Common error types used throughout docbatch.
//!
//! Covers the failure cases shared by the library crates: missing paths,
//! invalid user input and I/O failures.

use std::path::PathBuf;

/// Common error type for docbatch.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested path does not exist.
    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The path exists but is not a directory.
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An unknown conversion operation was requested.
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),
}

impl Error {
    /// Create a new NotFound error.
    pub fn not_found<P: Into<PathBuf>>(path: P) -> Self {
        Self::NotFound(path.into())
    }

    /// Create a new NotADirectory error.
    pub fn not_a_directory<P: Into<PathBuf>>(path: P) -> Self {
        Self::NotADirectory(path.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::not_found("/missing/dir");
        assert_eq!(err.to_string(), "Path not found: /missing/dir");

        let err = Error::not_a_directory("/etc/hosts");
        assert_eq!(err.to_string(), "Not a directory: /etc/hosts");

        let err = Error::invalid_input("max concurrency must be at least 1");
        assert_eq!(
            err.to_string(),
            "Invalid input: max concurrency must be at least 1"
        );

        let err = Error::UnknownOperation("zip-to-rar".to_string());
        assert_eq!(err.to_string(), "Unknown operation: zip-to-rar");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io(_)));
    }
}
