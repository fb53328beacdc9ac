// ============================================
// File: crates/skylink-core/src/error.rs
// ============================================
//! # Core Error Types
//!
//! ## Creation Reason
//! Defines error types specific to protocol and cryptographic operations
//! in the SkyLink core crate.
//!
//! ## Error Categories
//! 1. **Crypto Errors**: Key generation/parsing, encryption, decryption
//! 2. **Protocol Errors**: Credential parsing, frame size violations
//!
//! ## ⚠️ Important Note for Next Developer
//! - NEVER include key material or passwords in error messages
//! - `Decryption` is deliberately a unit variant: every decrypt failure
//!   (length, padding, digest, UTF-8) must look identical to the caller
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use thiserror::Error;

use skylink_common::error::CommonError;

// ============================================
// Result Type Alias
// ============================================

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

// ============================================
// CoreError
// ============================================

/// Core error types for protocol and cryptographic operations.
#[derive(Error, Debug)]
pub enum CoreError {
    // ========================================
    // Cryptographic Errors
    // ========================================

    /// Failed to generate a key pair.
    #[error("Key generation failed: {context}")]
    KeyGeneration {
        /// What key was being generated
        context: String,
    },

    /// A received or loaded public key could not be parsed.
    #[error("Invalid public key: {reason}")]
    InvalidPublicKey {
        /// Why the key was rejected
        reason: String,
    },

    /// A loaded private key could not be parsed or validated.
    #[error("Invalid private key: {reason}")]
    InvalidPrivateKey {
        /// Why the key was rejected
        reason: String,
    },

    /// Key is smaller than the minimum accepted modulus.
    #[error("Key too small: {bits} bits, minimum is {min}")]
    KeyTooSmall {
        /// Modulus size of the rejected key
        bits: usize,
        /// Minimum accepted modulus size
        min: usize,
    },

    /// Plaintext does not fit in a single OAEP block for the recipient key.
    #[error("Plaintext too large: max {max} bytes, got {actual}")]
    PlaintextTooLarge {
        /// Largest payload the key and padding allow
        max: usize,
        /// Actual payload size
        actual: usize,
    },

    /// Encryption operation failed.
    #[error("Encryption failed: {context}")]
    Encryption {
        /// What was being encrypted
        context: String,
    },

    /// Decryption failed. Carries no detail on purpose.
    #[error("Decryption failed")]
    Decryption,

    // ========================================
    // Protocol Errors
    // ========================================

    /// Message is malformed.
    #[error("Malformed message: {reason}")]
    MalformedMessage {
        /// What's wrong with the message
        reason: String,
    },

    /// Frame exceeds maximum allowed size.
    #[error("Message too large: max {max} bytes, got {actual}")]
    MessageTooLarge {
        /// Maximum allowed size
        max: usize,
        /// Actual size declared or supplied
        actual: usize,
    },

    // ========================================
    // Wrapped Errors
    // ========================================

    /// Error from common crate.
    #[error(transparent)]
    Common(#[from] CommonError),
}

impl CoreError {
    // ========================================
    // Convenience Constructors
    // ========================================

    /// Creates a `KeyGeneration` error.
    pub fn key_generation(context: impl Into<String>) -> Self {
        Self::KeyGeneration {
            context: context.into(),
        }
    }

    /// Creates an `InvalidPublicKey` error.
    pub fn invalid_public_key(reason: impl Into<String>) -> Self {
        Self::InvalidPublicKey {
            reason: reason.into(),
        }
    }

    /// Creates an `InvalidPrivateKey` error.
    pub fn invalid_private_key(reason: impl Into<String>) -> Self {
        Self::InvalidPrivateKey {
            reason: reason.into(),
        }
    }

    /// Creates an `Encryption` error.
    pub fn encryption(context: impl Into<String>) -> Self {
        Self::Encryption {
            context: context.into(),
        }
    }

    /// Creates a `MalformedMessage` error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedMessage {
            reason: reason.into(),
        }
    }

    /// Creates a `MessageTooLarge` error.
    pub const fn too_large(max: usize, actual: usize) -> Self {
        Self::MessageTooLarge { max, actual }
    }

    // ========================================
    // Error Classification
    // ========================================

    /// Returns `true` if this is a cryptographic error.
    #[must_use]
    pub const fn is_crypto_error(&self) -> bool {
        matches!(
            self,
            Self::KeyGeneration { .. }
                | Self::InvalidPublicKey { .. }
                | Self::InvalidPrivateKey { .. }
                | Self::KeyTooSmall { .. }
                | Self::PlaintextTooLarge { .. }
                | Self::Encryption { .. }
                | Self::Decryption
        )
    }

    /// Returns `true` if this is a protocol error.
    #[must_use]
    pub const fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedMessage { .. } | Self::MessageTooLarge { .. }
        )
    }

    /// Returns `true` if this error is a local programming mistake rather
    /// than bad peer input (e.g. encrypting an oversized payload).
    #[must_use]
    pub const fn is_caller_bug(&self) -> bool {
        matches!(self, Self::PlaintextTooLarge { .. } | Self::Encryption { .. })
    }

    /// Returns `true` if this error might indicate tampering or probing.
    #[must_use]
    pub const fn is_suspicious(&self) -> bool {
        matches!(
            self,
            Self::Decryption | Self::InvalidPublicKey { .. } | Self::MessageTooLarge { .. }
        )
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
        let err = CoreError::Decryption;
        assert_eq!(err.to_string(), "Decryption failed");

        let err = CoreError::too_large(65536, 70000);
        assert!(err.to_string().contains("65536"));
        assert!(err.to_string().contains("70000"));
    }

    #[test]
    fn test_error_classification() {
        assert!(CoreError::Decryption.is_crypto_error());
        assert!(CoreError::Decryption.is_suspicious());
        assert!(!CoreError::Decryption.is_caller_bug());

        let oversized = CoreError::PlaintextTooLarge { max: 190, actual: 200 };
        assert!(oversized.is_crypto_error());
        assert!(oversized.is_caller_bug());

        assert!(CoreError::malformed("no comma").is_protocol_error());
    }

    #[test]
    fn test_common_error_conversion() {
        let common = CommonError::invalid_input("field", "bad value");
        let core: CoreError = common.into();
        assert!(matches!(core, CoreError::Common(_)));
    }
}
