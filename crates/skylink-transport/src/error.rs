// ============================================
// File: crates/skylink-transport/src/error.rs
// ============================================
//! # Transport Error Types
//!
//! ## Creation Reason
//! Defines error types for socket setup and framed stream I/O.
//!
//! ## Main Functionality
//! - `TransportError`: Primary error enum for transport operations
//! - Conversion from `io::Error` and codec errors
//! - Classification of disconnects vs retryable conditions
//!
//! ## Error Categories
//! 1. **Setup Errors**: Bind, address parsing
//! 2. **Stream Errors**: Accept, connect, send, receive, timeouts
//! 3. **Framing Errors**: Oversized frames, truncated frames
//!
//! ## ⚠️ Important Note for Next Developer
//! - Every stream error is terminal for its connection only
//! - A `Codec` error means the peer broke framing; do not try to resync
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

use skylink_core::error::CoreError;

// ============================================
// Result Type Alias
// ============================================

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

// ============================================
// TransportError
// ============================================

/// Transport layer error types.
#[derive(Error, Debug)]
pub enum TransportError {
    // ========================================
    // Setup Errors
    // ========================================

    /// Failed to bind to address.
    #[error("Failed to bind to {addr}: {reason}")]
    BindFailed {
        /// Address we tried to bind to
        addr: SocketAddr,
        /// Why binding failed
        reason: String,
    },

    /// Address already in use.
    #[error("Address {addr} already in use")]
    AddressInUse {
        /// The address that's in use
        addr: SocketAddr,
    },

    /// Address string could not be parsed.
    #[error("Invalid address: {addr}")]
    InvalidAddress {
        /// The invalid address string
        addr: String,
    },

    // ========================================
    // Stream Errors
    // ========================================

    /// Accepting an incoming connection failed.
    #[error("Failed to accept connection: {reason}")]
    AcceptFailed {
        /// Why accept failed
        reason: String,
    },

    /// Outgoing connection failed.
    #[error("Failed to connect to {addr}: {reason}")]
    ConnectFailed {
        /// Address we tried to reach
        addr: SocketAddr,
        /// Why connecting failed
        reason: String,
    },

    /// Receive operation failed.
    #[error("Failed to receive: {reason}")]
    ReceiveFailed {
        /// Why receive failed
        reason: String,
    },

    /// Send operation failed.
    #[error("Failed to send: {reason}")]
    SendFailed {
        /// Why send failed
        reason: String,
    },

    /// Peer closed the connection while a reply was expected.
    #[error("Connection closed by peer")]
    ConnectionClosed,

    /// Peer closed the connection in the middle of a frame.
    #[error("Connection closed with {buffered} bytes of an unfinished frame")]
    TruncatedFrame {
        /// Bytes received for the unfinished frame
        buffered: usize,
    },

    /// No frame arrived within the allowed time.
    #[error("Timed out after {duration_ms} ms")]
    Timeout {
        /// How long we waited
        duration_ms: u64,
    },

    // ========================================
    // Wrapped Errors
    // ========================================

    /// Frame codec rejected the stream.
    #[error("Framing error: {0}")]
    Codec(#[from] CoreError),

    /// I/O error from the system.
    #[error("I/O error: {context}")]
    Io {
        /// What was happening when the error occurred
        context: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl TransportError {
    // ========================================
    // Convenience Constructors
    // ========================================

    /// Creates a `BindFailed` error.
    pub fn bind_failed(addr: SocketAddr, reason: impl Into<String>) -> Self {
        Self::BindFailed {
            addr,
            reason: reason.into(),
        }
    }

    /// Creates an `Io` error with context.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Creates a `ReceiveFailed` error.
    pub fn receive_failed(reason: impl Into<String>) -> Self {
        Self::ReceiveFailed {
            reason: reason.into(),
        }
    }

    /// Creates a `SendFailed` error.
    pub fn send_failed(reason: impl Into<String>) -> Self {
        Self::SendFailed {
            reason: reason.into(),
        }
    }

    /// Creates a `Timeout` error from a duration.
    #[must_use]
    pub fn timeout(duration: std::time::Duration) -> Self {
        Self::Timeout {
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        }
    }

    // ========================================
    // Error Classification
    // ========================================

    /// Returns `true` if this error is transient and retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::AcceptFailed { .. } => true,
            Self::Io { source, .. } => matches!(
                source.kind(),
                io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted | io::ErrorKind::TimedOut
            ),
            _ => false,
        }
    }

    /// Returns `true` if the peer went away (cleanly or not).
    #[must_use]
    pub const fn is_disconnect(&self) -> bool {
        matches!(
            self,
            Self::ConnectionClosed
                | Self::TruncatedFrame { .. }
                | Self::ReceiveFailed { .. }
                | Self::SendFailed { .. }
        )
    }

    /// Returns `true` if the peer violated framing.
    #[must_use]
    pub const fn is_protocol_violation(&self) -> bool {
        matches!(self, Self::Codec(_) | Self::TruncatedFrame { .. })
    }
}

// ============================================
// Error Conversions
// ============================================

impl From<io::Error> for TransportError {
    fn from(err: io::Error) -> Self {
        Self::Io {
            context: "unspecified I/O operation".into(),
            source: err,
        }
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_error_display() {
        let err = TransportError::bind_failed("127.0.0.1:5000".parse().unwrap(), "denied");
        assert!(err.to_string().contains("127.0.0.1:5000"));
        assert!(err.to_string().contains("denied"));

        let err = TransportError::timeout(Duration::from_secs(300));
        assert_eq!(err.to_string(), "Timed out after 300000 ms");
    }

    #[test]
    fn test_error_classification() {
        assert!(TransportError::ConnectionClosed.is_disconnect());
        assert!(TransportError::TruncatedFrame { buffered: 3 }.is_protocol_violation());
        assert!(TransportError::timeout(Duration::from_millis(5)).is_retryable());

        let codec: TransportError = CoreError::too_large(65536, 70000).into();
        assert!(codec.is_protocol_violation());
        assert!(!codec.is_disconnect());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::WouldBlock, "would block");
        let transport_err: TransportError = io_err.into();
        assert!(transport_err.is_retryable());
    }
}
