// ============================================
// File: crates/skylink-core/src/crypto/channel.rs
// ============================================
//! # Secure Channel
//!
//! ## Creation Reason
//! Provides per-message encryption for the command channel. Each message
//! is one RSA-OAEP block addressed to the recipient's public key; there
//! is no session key and no chunking.
//!
//! ## Main Functionality
//! - `SecureChannel`: Trait for encrypt/decrypt operations
//! - `RsaOaepChannel`: OAEP with SHA-256 digest and MGF1-SHA-256
//!
//! ## Ciphertext Format
//! ```text
//! ┌────────────────────────────────────────────────────┐
//! │ RSA-OAEP block (exactly modulus-size bytes)        │
//! │   plaintext ≤ modulus_bytes - 66                   │
//! └────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Encrypt and decrypt MUST share `padding()`; a mismatch makes every
//!   decrypt fail deterministically
//! - Every decrypt failure maps to the unit `CoreError::Decryption`; do not
//!   add detail, it would let a peer tell padding errors from length errors
//!
//! ## Last Modified
//! v0.1.0 - Initial secure channel

use rand::rngs::OsRng;
use rsa::traits::PublicKeyParts;
use rsa::Oaep;
use sha2::Sha256;

use super::keys::{KeyPair, PublicKey};
use super::max_plaintext_len;
use crate::error::{CoreError, Result};

// ============================================
// SecureChannel Trait
// ============================================

/// Encrypt/decrypt boundary between plaintext and wire ciphertext.
pub trait SecureChannel: Send + Sync {
    /// Encrypts `plaintext` so only the holder of `recipient`'s private key
    /// can read it.
    ///
    /// # Errors
    /// - `PlaintextTooLarge`: payload exceeds one OAEP block
    /// - `Encryption`: the RSA operation failed
    fn encrypt_for(&self, recipient: &PublicKey, plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Decrypts a ciphertext addressed to `keys`.
    ///
    /// # Errors
    /// `Decryption` for any malformed, foreign or tampered ciphertext.
    fn decrypt_with(&self, keys: &KeyPair, ciphertext: &[u8]) -> Result<Vec<u8>>;

    /// Largest plaintext `encrypt_for` accepts for `recipient`.
    fn max_plaintext_len(&self, recipient: &PublicKey) -> usize;

    /// Decrypts and decodes UTF-8 text.
    ///
    /// # Errors
    /// `Decryption` if decryption fails or the plaintext is not UTF-8.
    fn decrypt_text(&self, keys: &KeyPair, ciphertext: &[u8]) -> Result<String> {
        let plaintext = self.decrypt_with(keys, ciphertext)?;
        String::from_utf8(plaintext).map_err(|_| CoreError::Decryption)
    }
}

// ============================================
// RsaOaepChannel
// ============================================

/// RSA-OAEP implementation (SHA-256 digest, MGF1-SHA-256, empty label).
#[derive(Debug, Default, Clone, Copy)]
pub struct RsaOaepChannel;

impl RsaOaepChannel {
    /// Creates a new channel.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn padding() -> Oaep {
        Oaep::new::<Sha256>()
    }
}

impl SecureChannel for RsaOaepChannel {
    fn encrypt_for(&self, recipient: &PublicKey, plaintext: &[u8]) -> Result<Vec<u8>> {
        let max = self.max_plaintext_len(recipient);
        if plaintext.len() > max {
            return Err(CoreError::PlaintextTooLarge {
                max,
                actual: plaintext.len(),
            });
        }

        recipient
            .inner()
            .encrypt(&mut OsRng, Self::padding(), plaintext)
            .map_err(|e| CoreError::encryption(format!("RSA-OAEP: {e}")))
    }

    fn decrypt_with(&self, keys: &KeyPair, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let private = keys.private_key();
        if ciphertext.len() != private.size() {
            return Err(CoreError::Decryption);
        }

        private
            .decrypt(Self::padding(), ciphertext)
            .map_err(|_| CoreError::Decryption)
    }

    fn max_plaintext_len(&self, recipient: &PublicKey) -> usize {
        max_plaintext_len(recipient.size())
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::tests::shared_keys;

    #[test]
    fn test_roundtrip() {
        let keys = shared_keys();
        let channel = RsaOaepChannel::new();

        for plaintext in [&b""[..], b"takeoff", b"Message received.", &[0x5a; 190]] {
            let ciphertext = channel.encrypt_for(keys.public_key(), plaintext).unwrap();
            assert_eq!(ciphertext.len(), 256);
            assert_eq!(channel.decrypt_with(keys, &ciphertext).unwrap(), plaintext);
        }
    }

    #[test]
    fn test_encryption_is_randomized() {
        let keys = shared_keys();
        let channel = RsaOaepChannel::new();

        let a = channel.encrypt_for(keys.public_key(), b"land").unwrap();
        let b = channel.encrypt_for(keys.public_key(), b"land").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_oversized_plaintext_rejected() {
        let keys = shared_keys();
        let channel = RsaOaepChannel::new();
        assert_eq!(channel.max_plaintext_len(keys.public_key()), 190);

        let err = channel.encrypt_for(keys.public_key(), &[0u8; 191]).unwrap_err();
        assert!(matches!(err, CoreError::PlaintextTooLarge { max: 190, actual: 191 }));
    }

    #[test]
    fn test_garbage_ciphertext_fails() {
        let keys = shared_keys();
        let channel = RsaOaepChannel::new();

        let err = channel.decrypt_with(keys, b"garbage bytes").unwrap_err();
        assert!(matches!(err, CoreError::Decryption));

        let err = channel.decrypt_with(keys, &[0x42; 256]).unwrap_err();
        assert!(matches!(err, CoreError::Decryption));

        let err = channel.decrypt_with(keys, &[]).unwrap_err();
        assert!(matches!(err, CoreError::Decryption));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let keys = shared_keys();
        let channel = RsaOaepChannel::new();

        let mut ciphertext = channel.encrypt_for(keys.public_key(), b"takeoff").unwrap();
        ciphertext[100] ^= 0x01;
        assert!(matches!(
            channel.decrypt_with(keys, &ciphertext),
            Err(CoreError::Decryption)
        ));
    }

    #[test]
    fn test_wrong_key_fails() {
        let keys = shared_keys();
        let other = KeyPair::generate().unwrap();
        let channel = RsaOaepChannel::new();

        let ciphertext = channel.encrypt_for(other.public_key(), b"takeoff").unwrap();
        assert!(matches!(
            channel.decrypt_with(keys, &ciphertext),
            Err(CoreError::Decryption)
        ));
    }

    #[test]
    fn test_decrypt_text_rejects_invalid_utf8() {
        let keys = shared_keys();
        let channel = RsaOaepChannel::new();

        let ciphertext = channel.encrypt_for(keys.public_key(), &[0xff, 0xfe]).unwrap();
        assert!(matches!(
            channel.decrypt_text(keys, &ciphertext),
            Err(CoreError::Decryption)
        ));

        let ciphertext = channel.encrypt_for(keys.public_key(), "land".as_bytes()).unwrap();
        assert_eq!(channel.decrypt_text(keys, &ciphertext).unwrap(), "land");
    }
}
