// ============================================
// File: crates/skylink-common/src/error.rs
// ============================================
//! # Common Error Types
//!
//! ## Creation Reason
//! Provides foundational error types and result aliases used across
//! all SkyLink crates, enabling consistent error handling.
//!
//! ## Main Functionality
//! - `CommonError`: Base error enum for common operations
//! - `Result<T>`: Type alias using `CommonError`
//!
//! ## Design Philosophy
//! - Use `thiserror` for ergonomic error definitions
//! - Each crate defines its own error type that wraps `CommonError`
//! - Errors should be informative without leaking secrets
//!
//! ## ⚠️ Important Note for Next Developer
//! - Never include passwords or key material in error messages
//! - Implement `From` traits for seamless error propagation
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use std::fmt;
use thiserror::Error;

// ============================================
// Result Type Alias
// ============================================

/// Common result type for operations that may fail.
pub type Result<T> = std::result::Result<T, CommonError>;

// ============================================
// CommonError
// ============================================

/// Common error types shared across SkyLink crates.
///
/// # Categories
/// - **Validation**: Input validation failures
/// - **IO**: System I/O errors
/// - **Encoding**: Decoding errors
/// - **Internal**: Unexpected internal state
///
/// # Example
/// ```
/// use skylink_common::error::{CommonError, Result};
///
/// fn validate_username(name: &str) -> Result<()> {
///     if name.is_empty() {
///         return Err(CommonError::invalid_input("username", "cannot be empty"));
///     }
///     Ok(())
/// }
///
/// assert!(validate_username("").is_err());
/// ```
#[derive(Error, Debug)]
pub enum CommonError {
    // ========================================
    // Validation Errors
    // ========================================

    /// Invalid input data provided.
    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput {
        /// Name of the field or parameter
        field: String,
        /// Description of what's wrong
        reason: String,
    },

    /// Data length doesn't match expected size.
    #[error("Invalid length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Expected length in bytes
        expected: usize,
        /// Actual length received
        actual: usize,
    },

    // ========================================
    // IO Errors
    // ========================================

    /// System I/O error occurred.
    #[error("I/O error: {context}")]
    Io {
        /// What operation was being performed
        context: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    // ========================================
    // Encoding Errors
    // ========================================

    /// Failed to decode data.
    #[error("Decoding error: {context}")]
    Decoding {
        /// What was being decoded
        context: String,
        /// Error details
        details: String,
    },

    // ========================================
    // Internal Errors
    // ========================================

    /// Internal error (bug or unexpected condition).
    #[error("Internal error: {message}")]
    Internal {
        /// Description of what went wrong
        message: String,
    },
}

impl CommonError {
    // ========================================
    // Convenience Constructors
    // ========================================

    /// Creates an `InvalidInput` error.
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an `InvalidLength` error.
    pub const fn invalid_length(expected: usize, actual: usize) -> Self {
        Self::InvalidLength { expected, actual }
    }

    /// Creates an `Io` error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Creates a `Decoding` error.
    pub fn decoding(context: impl Into<String>, details: impl fmt::Display) -> Self {
        Self::Decoding {
            context: context.into(),
            details: details.to_string(),
        }
    }

    /// Creates an `Internal` error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    // ========================================
    // Error Classification
    // ========================================

    /// Returns `true` if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Returns `true` if this error indicates a client mistake.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. } | Self::InvalidLength { .. } | Self::Decoding { .. }
        )
    }

    /// Returns `true` if this error indicates a server-side issue.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }
}

// ============================================
// Error Conversions
// ============================================

impl From<std::io::Error> for CommonError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            context: "unspecified I/O operation".into(),
            source: err,
        }
    }
}

impl From<base64::DecodeError> for CommonError {
    fn from(err: base64::DecodeError) -> Self {
        Self::decoding("base64 decode", err)
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CommonError::invalid_input("username", "cannot contain ','");
        assert!(err.to_string().contains("username"));
        assert!(err.to_string().contains("','"));
    }

    #[test]
    fn test_error_classification() {
        let client_err = CommonError::invalid_input("field", "bad");
        assert!(client_err.is_client_error());
        assert!(!client_err.is_server_error());
        assert!(!client_err.is_retryable());

        let server_err = CommonError::internal("bug");
        assert!(server_err.is_server_error());
        assert!(!server_err.is_client_error());

        let io_err = CommonError::io("reading key", std::io::Error::other("disk"));
        assert!(io_err.is_retryable());
        assert!(io_err.to_string().contains("reading key"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let common_err: CommonError = io_err.into();
        assert!(matches!(common_err, CommonError::Io { .. }));
    }
}
