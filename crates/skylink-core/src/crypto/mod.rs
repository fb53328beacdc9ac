// ============================================
// File: crates/skylink-core/src/crypto/mod.rs
// ============================================
//! # Cryptography Module
//!
//! ## Creation Reason
//! Centralizes all cryptographic operations for the SkyLink command channel,
//! using RustCrypto implementations (`rsa`, `sha2`).
//!
//! ## Main Functionality
//!
//! ### Submodules
//! - [`keys`]: RSA key store (`KeyPair`, `PublicKey`, PEM interchange)
//! - [`channel`]: Per-message RSA-OAEP encryption (`SecureChannel`)
//! - [`password`]: Salted SHA-256 password digests
//!
//! ## Cryptographic Design
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Key Exchange Phase                       │
//! │  Client                                        Server       │
//! │    │  "username,password" ───────────────────────► │        │
//! │    │ ◄─────────────────── "Authenticated successfully!"     │
//! │    │ ◄─────────────────── server public key (SPKI PEM)      │
//! │    │  client public key (mutual mode only) ──────► │        │
//! └─────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Message Phase                            │
//! │                                                             │
//! │   text ──► RSA-OAEP(server pub) ──► server decrypts         │
//! │   ack  ◄── RSA-OAEP(client pub) ◄── "Message received."     │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Padding Scheme
//! OAEP with SHA-256 as both the label digest and the MGF1 digest, empty
//! label. Overhead is `2 * 32 + 2` bytes per block, so a 2048-bit key
//! carries at most 190 bytes of plaintext.
//!
//! ## ⚠️ Important Note for Next Developer
//! - NEVER roll your own crypto
//! - There is no chunking: oversized payloads are rejected, not split
//! - Private keys never leave `KeyPair`; only `channel` touches them
//!
//! ## Last Modified
//! v0.1.0 - Initial crypto implementation

pub mod channel;
pub mod keys;
pub mod password;

// Re-export primary types at module level
pub use channel::{RsaOaepChannel, SecureChannel};
pub use keys::{KeyPair, PublicKey};
pub use password::PasswordHash;

// ============================================
// Constants
// ============================================

/// RSA modulus size used for every generated key pair.
pub const RSA_KEY_BITS: usize = 2048;

/// Smallest modulus accepted when loading or receiving a key.
pub const MIN_RSA_KEY_BITS: usize = 2048;

/// Fixed RSA public exponent.
pub const RSA_PUBLIC_EXPONENT: u32 = 65_537;

/// Output size of the OAEP digest (SHA-256).
pub const OAEP_HASH_SIZE: usize = 32;

/// Bytes of each OAEP block consumed by padding.
pub const OAEP_OVERHEAD: usize = 2 * OAEP_HASH_SIZE + 2;

/// Size of the random salt prepended to stored password digests.
pub const PASSWORD_SALT_SIZE: usize = 16;

/// Largest plaintext a key of `modulus_bytes` can carry in one OAEP block.
#[must_use]
pub const fn max_plaintext_len(modulus_bytes: usize) -> usize {
    modulus_bytes.saturating_sub(OAEP_OVERHEAD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_plaintext_len() {
        assert_eq!(max_plaintext_len(RSA_KEY_BITS / 8), 190);
        assert_eq!(max_plaintext_len(512), 446);
        assert_eq!(max_plaintext_len(10), 0);
    }
}
