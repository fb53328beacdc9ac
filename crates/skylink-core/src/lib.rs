// ============================================
// File: crates/skylink-core/src/lib.rs
// ============================================
//! # SkyLink Core - Protocol & Cryptography Library
//!
//! ## Creation Reason
//! Provides the protocol definitions and cryptographic operations of the
//! SkyLink command channel. Everything that decides what bytes go on the
//! wire lives here; sockets and tasks live in the crates above.
//!
//! ## Main Functionality
//!
//! ### Crypto Module ([`crypto`])
//! - `KeyPair` / `PublicKey`: RSA-2048 key store with PEM interchange
//! - `SecureChannel`: RSA-OAEP (SHA-256 digest + MGF1-SHA-256) encrypt/decrypt
//! - `PasswordHash`: salted SHA-256 credential digests
//!
//! ### Protocol Module ([`protocol`])
//! - Reply literals and the credential line format
//! - The closed command vocabulary (`takeoff`, `land`)
//! - Length-prefixed frame codec
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              skylink-server                         │
//! │                    │                                │
//! │         ┌──────────┴──────────┐                    │
//! │         ▼                     ▼                    │
//! │   skylink-core  ◄──── skylink-transport            │
//! │   You are here                                     │
//! │         │                                          │
//! │         ▼                                          │
//! │   skylink-common                                   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - ALL cryptographic code uses RustCrypto implementations
//! - NEVER implement custom crypto primitives
//! - Encrypt and decrypt MUST use the same OAEP parameters
//! - Reply literals are part of the wire contract; do not reword them
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod crypto;
pub mod error;
pub mod protocol;

// Re-export commonly used items
pub use crypto::{KeyPair, PasswordHash, PublicKey, RsaOaepChannel, SecureChannel};
pub use error::{CoreError, Result};
pub use protocol::{Command, Credentials, FrameCodec};
