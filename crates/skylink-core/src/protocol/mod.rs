// ============================================
// File: crates/skylink-core/src/protocol/mod.rs
// ============================================
//! # Protocol Module
//!
//! ## Creation Reason
//! Defines the SkyLink wire protocol: how frames are delimited, which
//! literal replies the server sends, how a login line is laid out and
//! which texts count as actuator commands.
//!
//! ## Main Functionality
//!
//! ### Submodules
//! - [`messages`]: Reply literals, `Credentials`, `Command`
//! - [`codec`]: Length-prefixed framing (`FrameCodec`)
//!
//! ## Protocol Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Login Phase (plaintext)                  │
//! │                                                             │
//! │  Client ──────── "username,password" ──────────────► Server │
//! │  Client ◄─────── "Authentication failed!" ───────── Server │
//! │                  (repeat until success)                     │
//! │  Client ◄─────── "Authenticated successfully!" ──── Server │
//! │  Client ◄─────── server public key (SPKI PEM) ───── Server │
//! │                                                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    Message Phase                            │
//! │                                                             │
//! │  Client ══════ RSA-OAEP(server key, text) ══════════ Server │
//! │  Client ◄═════ RSA-OAEP(client key, ack) ═══════════ Server │
//! │                 or plaintext "Decryption failed!"           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format Principles
//! - Every message is one frame: `u32` little-endian length, then payload
//! - Reply literals are ASCII and exact; clients compare them byte for byte
//!
//! ## ⚠️ Important Note for Next Developer
//! - Changing a literal breaks every deployed client
//! - "Decryption failed!" is the only reply sent in plaintext after login
//!
//! ## Last Modified
//! v0.1.0 - Initial protocol definitions

pub mod codec;
pub mod messages;

// Re-export primary types
pub use codec::{FrameCodec, FRAME_HEADER_SIZE, MAX_FRAME_LEN};
pub use messages::{
    Command, Credentials, ACK_MESSAGE_RECEIVED, AUTH_FAILED, AUTH_SUCCESS, DECRYPTION_FAILED,
    INVALID_CREDENTIALS_FORMAT, INVALID_PUBLIC_KEY, TOO_MANY_ATTEMPTS,
};
