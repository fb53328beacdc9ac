// ============================================
// File: crates/skylink-core/src/protocol/messages.rs
// ============================================
//! # Protocol Messages
//!
//! ## Creation Reason
//! Holds the fixed vocabulary of the command channel: the literal replies,
//! the `username,password` login line, and the closed set of actuator
//! commands.
//!
//! ## Main Functionality
//! - Reply literal constants
//! - `Credentials`: parsed login line, password zeroed on drop
//! - `Command`: `takeoff` / `land`, matched trimmed and case-insensitively
//!
//! ## ⚠️ Important Note for Next Developer
//! - `Credentials` parsing only strips a trailing line ending; spaces
//!   around the comma are part of the username or password
//!
//! ## Last Modified
//! v0.1.0 - Initial message definitions

use std::fmt;

use zeroize::Zeroizing;

use crate::error::{CoreError, Result};

// ============================================
// Reply Literals
// ============================================

/// Sent once the credential pair matched a registered identity.
pub const AUTH_SUCCESS: &str = "Authenticated successfully!";

/// Sent when the credential pair matched nothing.
pub const AUTH_FAILED: &str = "Authentication failed!";

/// Sent when the login frame is not exactly two comma-separated fields.
pub const INVALID_CREDENTIALS_FORMAT: &str = "Invalid credentials format. Use username,password.";

/// Plaintext of the encrypted acknowledgment for every decrypted message.
pub const ACK_MESSAGE_RECEIVED: &str = "Message received.";

/// Plaintext reply when an incoming ciphertext cannot be decrypted.
pub const DECRYPTION_FAILED: &str = "Decryption failed!";

/// Sent before closing once the login attempt limit is reached.
pub const TOO_MANY_ATTEMPTS: &str = "Too many authentication attempts.";

/// Sent before closing when a mutual-mode client key cannot be parsed.
pub const INVALID_PUBLIC_KEY: &str = "Invalid public key.";

/// Separator between username and password on the login line.
pub const CREDENTIAL_SEPARATOR: char = ',';

// ============================================
// Credentials
// ============================================

/// A parsed `username,password` login line.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Builds credentials for sending.
    ///
    /// # Errors
    /// Returns `MalformedMessage` if either field contains the separator;
    /// the server could not split such a line back apart.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let username = username.into();
        let password = Zeroizing::new(password.into());
        if username.contains(CREDENTIAL_SEPARATOR) || password.contains(CREDENTIAL_SEPARATOR) {
            return Err(CoreError::malformed("credentials must not contain ','"));
        }
        Ok(Self { username, password })
    }

    /// Parses a received login frame.
    ///
    /// The payload must be UTF-8 and split on `,` into exactly two fields.
    /// A single trailing `\n` or `\r\n` is ignored.
    ///
    /// # Errors
    /// Returns `MalformedMessage` for anything else.
    pub fn parse(frame: &[u8]) -> Result<Self> {
        let line = std::str::from_utf8(frame)
            .map_err(|_| CoreError::malformed("credentials are not UTF-8"))?;
        let line = line
            .strip_suffix('\n')
            .map_or(line, |l| l.strip_suffix('\r').unwrap_or(l));

        let mut fields = line.split(CREDENTIAL_SEPARATOR);
        match (fields.next(), fields.next(), fields.next()) {
            (Some(username), Some(password), None) => Ok(Self {
                username: username.to_string(),
                password: Zeroizing::new(password.to_string()),
            }),
            _ => Err(CoreError::malformed("expected exactly two comma-separated fields")),
        }
    }

    /// Username as sent.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Password as sent.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Encodes the login line for the wire.
    #[must_use]
    pub fn to_line(&self) -> Zeroizing<String> {
        Zeroizing::new(format!(
            "{}{CREDENTIAL_SEPARATOR}{}",
            self.username,
            self.password.as_str()
        ))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

// ============================================
// Command
// ============================================

/// Actuator command vocabulary. Any other text is chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Leave the ground.
    TakeOff,
    /// Return to the ground.
    Land,
}

impl Command {
    /// Classifies decrypted text. Surrounding whitespace and case are ignored.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("takeoff") {
            Some(Self::TakeOff)
        } else if text.eq_ignore_ascii_case("land") {
            Some(Self::Land)
        } else {
            None
        }
    }

    /// Canonical wire spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TakeOff => "takeoff",
            Self::Land => "land",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================
// Tests
// ============================================
