// ============================================
// File: crates/skylink-core/src/crypto/password.rs
// ============================================
//! # Password Digests
//!
//! ## Creation Reason
//! Credentials are compared by exact match. Storing them in plaintext is
//! supported for compatibility, but operators can store a salted SHA-256
//! digest instead and the registry compares against that.
//!
//! ## Stored Format
//! ```text
//! <salt: 16 bytes hex> '$' <SHA-256(salt || password): 32 bytes hex>
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Comparisons go through `subtle` so timing does not reveal prefixes
//! - A single SHA-256 round is not a password KDF; it only keeps
//!   plaintext out of config files
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use skylink_common::error::CommonError;

use super::PASSWORD_SALT_SIZE;
use crate::error::{CoreError, Result};

const DIGEST_SIZE: usize = 32;

/// Salted SHA-256 digest of a password.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash {
    salt: [u8; PASSWORD_SALT_SIZE],
    digest: [u8; DIGEST_SIZE],
}

impl PasswordHash {
    /// Hashes `password` under a fresh random salt.
    #[must_use]
    pub fn generate(password: &str) -> Self {
        let mut salt = [0u8; PASSWORD_SALT_SIZE];
        rand::thread_rng().fill_bytes(&mut salt);
        Self::with_salt(password, salt)
    }

    /// Hashes `password` under a caller-supplied salt.
    #[must_use]
    pub fn with_salt(password: &str, salt: [u8; PASSWORD_SALT_SIZE]) -> Self {
        Self {
            salt,
            digest: Self::digest(&salt, password),
        }
    }

    /// Returns `true` if `password` produces the stored digest.
    #[must_use]
    pub fn verify(&self, password: &str) -> bool {
        let candidate = Self::digest(&self.salt, password);
        candidate.ct_eq(&self.digest).into()
    }

    fn digest(salt: &[u8], password: &str) -> [u8; DIGEST_SIZE] {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(password.as_bytes());
        hasher.finalize().into()
    }
}

impl FromStr for PasswordHash {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let (salt_hex, digest_hex) = s.split_once('$').ok_or_else(|| {
            CommonError::invalid_input("password_hash", "expected '<salt>$<digest>'")
        })?;

        let salt: [u8; PASSWORD_SALT_SIZE] = decode_fixed(salt_hex, "password_hash salt")?;
        let digest: [u8; DIGEST_SIZE] = decode_fixed(digest_hex, "password_hash digest")?;
        Ok(Self { salt, digest })
    }
}

fn decode_fixed<const N: usize>(text: &str, context: &str) -> Result<[u8; N]> {
    let bytes = hex::decode(text).map_err(|e| CommonError::decoding(context, e))?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| CommonError::invalid_length(N, len).into())
}

impl fmt::Display for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}${}", hex::encode(self.salt), hex::encode(self.digest))
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify() {
        let hash = PasswordHash::generate("password1");
        assert!(hash.verify("password1"));
        assert!(!hash.verify("password2"));
        assert!(!hash.verify(""));
    }

    #[test]
    fn test_salt_changes_digest() {
        let a = PasswordHash::with_salt("password1", [1; PASSWORD_SALT_SIZE]);
        let b = PasswordHash::with_salt("password1", [2; PASSWORD_SALT_SIZE]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_display_parse() {
        let hash = PasswordHash::generate("hunter2");
        let text = hash.to_string();
        assert_eq!(text.len(), 32 + 1 + 64);

        let parsed: PasswordHash = text.parse().unwrap();
        assert_eq!(parsed, hash);
        assert!(parsed.verify("hunter2"));
    }

    #[test]
    fn test_parse_errors() {
        assert!("no-separator".parse::<PasswordHash>().is_err());
        assert!("zz$00".parse::<PasswordHash>().is_err());

        let short_salt = format!("{}${}", "00".repeat(4), "00".repeat(32));
        let err = short_salt.parse::<PasswordHash>().unwrap_err();
        assert!(matches!(
            err,
            CoreError::Common(CommonError::InvalidLength { expected: 16, actual: 4 })
        ));
    }

    #[test]
    fn test_debug_redacted() {
        let hash = PasswordHash::generate("secret");
        assert_eq!(format!("{hash:?}"), "PasswordHash([REDACTED])");
    }
}
