// ============================================
// File: crates/skylink-common/src/types.rs
// ============================================
//! # Core Type Definitions
//!
//! ## Creation Reason
//! Centralizes identifier types used throughout SkyLink so every crate
//! logs and tracks connections the same way.
//!
//! ## Main Functionality
//! - `SessionId`: Unique identifier for one connection's session (16 bytes)
//!
//! ## ⚠️ Important Note for Next Developer
//! - SessionId is only a correlation handle; it is never sent on the wire
//! - Always generate it from a cryptographically secure RNG anyway, so it
//!   cannot be guessed from logs
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::RngCore;
use zeroize::Zeroize;

use crate::error::CommonError;

// ============================================
// Constants
// ============================================

/// Size of SessionId in bytes
pub const SESSION_ID_SIZE: usize = 16;

// ============================================
// SessionId
// ============================================

/// Unique identifier for a connection's session.
///
/// # Example
/// ```
/// use skylink_common::types::SessionId;
///
/// let session_id = SessionId::generate();
/// let restored = SessionId::from_bytes(session_id.as_bytes()).unwrap();
///
/// assert_eq!(session_id, restored);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Zeroize)]
pub struct SessionId([u8; SESSION_ID_SIZE]);

impl Drop for SessionId {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl SessionId {
    /// Creates a new `SessionId` from raw bytes.
    ///
    /// Returns `None` if `bytes` is not exactly 16 bytes long.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != SESSION_ID_SIZE {
            return None;
        }
        let mut id = [0u8; SESSION_ID_SIZE];
        id.copy_from_slice(bytes);
        Some(Self(id))
    }

    /// Generates a new cryptographically random `SessionId`.
    #[must_use]
    pub fn generate() -> Self {
        let mut id = [0u8; SESSION_ID_SIZE];
        rand::thread_rng().fill_bytes(&mut id);
        Self(id)
    }

    /// Returns the raw bytes of the session ID.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SESSION_ID_SIZE] {
        &self.0
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SessionId({:02x}{:02x}{:02x}{:02x}...)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", BASE64.encode(self.0))
    }
}

impl FromStr for SessionId {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = BASE64.decode(s)?;
        Self::from_bytes(&bytes)
            .ok_or_else(|| CommonError::invalid_length(SESSION_ID_SIZE, bytes.len()))
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_unique() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_session_id_display_parse() {
        let id = SessionId::generate();
        let parsed: SessionId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_session_id_wrong_length() {
        assert!(SessionId::from_bytes(&[0u8; 8]).is_none());

        let short = BASE64.encode([1u8; 4]);
        let err = short.parse::<SessionId>().unwrap_err();
        assert!(matches!(err, CommonError::InvalidLength { expected: 16, actual: 4 }));
    }

    #[test]
    fn test_session_id_debug_is_truncated() {
        let id = SessionId::from_bytes(&[0xab; SESSION_ID_SIZE]).unwrap();
        assert_eq!(format!("{id:?}"), "SessionId(abababab...)");
    }
}
