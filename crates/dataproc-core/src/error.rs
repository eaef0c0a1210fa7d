//! Error types for dataproc
//!
//! Provides the unified error taxonomy shared by the stream and analysis crates.
//! Every failure is one of three kinds: a violated precondition, an operational
//! failure during execution, or use of a handle whose shared state is gone.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Core error type for dataproc operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A parameter violates a documented precondition.
    ///
    /// Raised before any state is mutated.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Operational failure during execution (checksum mismatch, codec
    /// failure, concurrent use, memory limit)
    #[error("Runtime error: {0}")]
    RuntimeFailure(String),

    /// Method invoked on a handle that never initialized or whose shared
    /// resources were torn down
    #[error("Not initialized: {0}")]
    NotInitialized(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error category, as reported to diagnostics sinks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidArgument,
    RuntimeFailure,
    NotInitialized,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidArgument => write!(f, "InvalidArgument"),
            ErrorKind::RuntimeFailure => write!(f, "RuntimeFailure"),
            ErrorKind::NotInitialized => write!(f, "NotInitialized"),
        }
    }
}

// Helper functions for common error patterns

impl Error {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Error::RuntimeFailure(_) => ErrorKind::RuntimeFailure,
            Error::NotInitialized(_) => ErrorKind::NotInitialized,
        }
    }

    /// The message without the category prefix
    pub fn message(&self) -> &str {
        match self {
            Error::InvalidArgument(m) | Error::RuntimeFailure(m) | Error::NotInitialized(m) => m,
        }
    }

    /// Create an error for size mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidArgument(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str) -> Self {
        Self::InvalidArgument(format!("{context} contains NaN or infinite values"))
    }

    /// Concurrent use of a single-job resource
    pub fn busy() -> Self {
        Self::RuntimeFailure("busy".to_string())
    }

    /// Integrity check failed
    pub fn checksum_mismatch() -> Self {
        Self::RuntimeFailure("checksum mismatch".to_string())
    }

    /// Wrap a lower-level failure raised during `stage`
    pub fn runtime(stage: &str, source: impl fmt::Display) -> Self {
        Self::RuntimeFailure(format!("{stage} failed: {source}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidArgument("parallel_workers must be in [1, 16]".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid argument: parallel_workers must be in [1, 16]"
        );

        let err = Error::RuntimeFailure("checksum mismatch".to_string());
        assert_eq!(err.to_string(), "Runtime error: checksum mismatch");

        let err = Error::NotInitialized("lifecycle torn down".to_string());
        assert_eq!(err.to_string(), "Not initialized: lifecycle torn down");
    }

    #[test]
    fn test_error_helper_functions() {
        let err = Error::size_mismatch(5, 4, "timestamps");
        assert_eq!(
            err.to_string(),
            "Invalid argument: Size mismatch in timestamps: expected 5, got 4"
        );
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = Error::non_finite("input data");
        assert_eq!(
            err.to_string(),
            "Invalid argument: input data contains NaN or infinite values"
        );

        assert_eq!(Error::busy(), Error::RuntimeFailure("busy".to_string()));
        assert_eq!(Error::checksum_mismatch().message(), "checksum mismatch");

        let err = Error::runtime("zstd decompression", "unexpected end of frame");
        assert_eq!(
            err.to_string(),
            "Runtime error: zstd decompression failed: unexpected end of frame"
        );
    }

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(Error::busy().kind(), ErrorKind::RuntimeFailure);
        assert_eq!(
            Error::NotInitialized(String::new()).kind(),
            ErrorKind::NotInitialized
        );
        assert_eq!(ErrorKind::RuntimeFailure.to_string(), "RuntimeFailure");
    }

    #[test]
    fn test_error_edge_cases() {
        let err = Error::InvalidArgument("".to_string());
        assert_eq!(err.to_string(), "Invalid argument: ");
        assert_eq!(err.message(), "");

        let long_str = "a".repeat(1000);
        let err = Error::RuntimeFailure(long_str.clone());
        assert_eq!(err.to_string(), format!("Runtime error: {}", long_str));
    }

    #[test]
    fn test_error_chaining() {
        fn inner_function() -> Result<()> {
            Err(Error::RuntimeFailure("inner error".to_string()))
        }

        fn outer_function() -> Result<()> {
            inner_function().map_err(|e| Error::runtime("outer", e))
        }

        let err = outer_function().unwrap_err();
        assert!(err.to_string().contains("outer failed"));
        assert!(err.to_string().contains("inner error"));
    }
}
