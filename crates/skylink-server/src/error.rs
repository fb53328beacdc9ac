// ============================================
// File: crates/skylink-server/src/error.rs
// ============================================
//! # Server Error Types
//!
//! ## Creation Reason
//! Collects every failure the server and client can hit, from config
//! loading through per-connection protocol errors.
//!
//! ## ⚠️ Important Note for Next Developer
//! - Per-connection errors end that connection only; `SessionHandler`
//!   logs them and never lets them reach the accept loop
//! - `AuthenticationFailed` carries no username on purpose
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use thiserror::Error;

use skylink_common::error::CommonError;
use skylink_core::error::CoreError;
use skylink_transport::error::TransportError;

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Server error types.
#[derive(Error, Debug)]
pub enum ServerError {
    // ========================================
    // Configuration Errors
    // ========================================

    /// Configuration file could not be read or parsed.
    #[error("Failed to load configuration from '{path}': {reason}")]
    ConfigLoad {
        /// Path that was being loaded
        path: String,
        /// Why loading failed
        reason: String,
    },

    /// Configuration parsed but a value is unusable.
    #[error("Invalid configuration: {field} - {reason}")]
    ConfigInvalid {
        /// Dotted field name
        field: String,
        /// Why it's invalid
        reason: String,
    },

    // ========================================
    // Authentication Errors
    // ========================================

    /// Login line was not `username,password`.
    #[error("Invalid credentials format: {reason}")]
    CredentialFormat {
        /// What was wrong with the line
        reason: String,
    },

    /// No registered identity matched the credential pair.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// Login attempt limit reached; the connection is closed.
    #[error("Too many authentication attempts ({attempts})")]
    TooManyAttempts {
        /// Attempts made on the connection
        attempts: u32,
    },

    /// Operation requires a completed login.
    #[error("Not authenticated")]
    NotAuthenticated,

    // ========================================
    // Lifecycle Errors
    // ========================================

    /// Server failed to start.
    #[error("Server failed to start: {reason}")]
    StartupFailed {
        /// Why startup failed
        reason: String,
    },

    /// Internal error (bug or unexpected condition).
    #[error("Internal error: {message}")]
    Internal {
        /// Description of what went wrong
        message: String,
    },

    // ========================================
    // Wrapped Errors
    // ========================================

    /// Error from common crate.
    #[error(transparent)]
    Common(#[from] CommonError),

    /// Error from core crate.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Error from transport crate.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    // ========================================
    // Convenience Constructors
    // ========================================

    /// Creates a `ConfigLoad` error.
    pub fn config_load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `ConfigInvalid` error.
    pub fn config_invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `CredentialFormat` error.
    pub fn credential_format(reason: impl Into<String>) -> Self {
        Self::CredentialFormat {
            reason: reason.into(),
        }
    }

    /// Creates a `StartupFailed` error.
    pub fn startup_failed(reason: impl Into<String>) -> Self {
        Self::StartupFailed {
            reason: reason.into(),
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

    /// Returns `true` for configuration errors.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigLoad { .. } | Self::ConfigInvalid { .. })
    }

    /// Returns `true` for login failures.
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Self::CredentialFormat { .. }
                | Self::AuthenticationFailed
                | Self::TooManyAttempts { .. }
                | Self::NotAuthenticated
        )
    }

    /// Returns `true` if the connection can continue after this error
    /// (the peer is told and may try again).
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::CredentialFormat { .. }
                | Self::AuthenticationFailed
                | Self::Core(CoreError::Decryption)
        )
    }

    /// Returns `true` if the peer simply went away.
    #[must_use]
    pub const fn is_disconnect(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_disconnect(),
            _ => false,
        }
    }

    /// Returns `true` if the process cannot continue.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConfigLoad { .. } | Self::ConfigInvalid { .. } | Self::StartupFailed { .. }
        )
    }

    /// Returns `true` if retrying the operation may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_retryable(),
            _ => false,
        }
    }
}
