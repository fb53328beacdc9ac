// ============================================
// File: crates/skylink-transport/src/traits.rs
// ============================================
//! # Transport Traits
//!
//! ## Creation Reason
//! Decouples the session state machine from sockets so the same handler
//! runs over TCP in production and over in-memory pipes in tests.
//!
//! ## Main Functionality
//! - `MessageStream`: Ordered, reliable, message-oriented duplex stream
//!
//! ## ⚠️ Important Note for Next Developer
//! - `recv` must be cancel-safe: the session wraps it in a timeout
//! - `Ok(None)` means the peer closed cleanly between frames
//!
//! ## Last Modified
//! v0.1.0 - Initial trait definitions

use std::net::SocketAddr;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

// ============================================
// MessageStream Trait
// ============================================

/// A duplex stream of discrete messages.
#[async_trait]
pub trait MessageStream: Send {
    /// Receives the next message.
    ///
    /// # Returns
    /// - `Ok(Some(bytes))` - One complete message
    /// - `Ok(None)` - Peer closed the stream at a message boundary
    ///
    /// # Errors
    /// Any I/O or framing failure; the stream is unusable afterwards.
    async fn recv(&mut self) -> Result<Option<Bytes>>;

    /// Sends one message and flushes it.
    ///
    /// # Errors
    /// Any I/O failure, or a payload above the frame limit.
    async fn send(&mut self, payload: &[u8]) -> Result<()>;

    /// Remote address, if the stream has one.
    fn peer_addr(&self) -> Option<SocketAddr>;
}
