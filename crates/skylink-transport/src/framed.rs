// ============================================
// File: crates/skylink-transport/src/framed.rs
// ============================================
//! # Framed Connection
//!
//! ## Creation Reason
//! Adapts any `AsyncRead + AsyncWrite` byte stream into a
//! `MessageStream` using the length-prefixed `FrameCodec`.
//!
//! ## Read Path
//! ```text
//! socket ──read_buf──► read_buf (BytesMut) ──FrameCodec::decode──► Bytes
//!                         ▲                          │
//!                         └──── partial frame ◄──────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Partial frames stay in `read_buf` across calls, which is what keeps
//!   `recv` cancel-safe under `tokio::time::timeout`
//! - Writes go out in one `write_all` so a frame is never interleaved
//!
//! ## Last Modified
//! v0.1.0 - Initial framed connection

use std::net::SocketAddr;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::trace;

use skylink_core::protocol::FrameCodec;

use crate::error::{Result, TransportError};
use crate::traits::MessageStream;

/// Initial read buffer capacity; one RSA-2048 ciphertext plus header.
const INITIAL_READ_CAPACITY: usize = 512;

// ============================================
// FramedConnection
// ============================================

/// Message-oriented wrapper around a byte stream.
///
/// # Example
/// ```ignore
/// let (client, server) = tokio::io::duplex(1024);
/// let mut client = FramedConnection::new(client);
/// let mut server = FramedConnection::new(server);
///
/// client.send(b"user1,password1").await?;
/// let frame = server.recv().await?.unwrap();
/// ```
pub struct FramedConnection<S> {
    stream: S,
    codec: FrameCodec,
    read_buf: BytesMut,
    write_buf: BytesMut,
    peer: Option<SocketAddr>,
}

impl<S> FramedConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wraps a stream with the default frame limit.
    pub fn new(stream: S) -> Self {
        Self::with_codec(stream, FrameCodec::new())
    }

    /// Wraps a stream with a custom codec.
    pub fn with_codec(stream: S, codec: FrameCodec) -> Self {
        Self {
            stream,
            codec,
            read_buf: BytesMut::with_capacity(INITIAL_READ_CAPACITY),
            write_buf: BytesMut::new(),
            peer: None,
        }
    }

    /// Records the remote address reported by `peer_addr`.
    #[must_use]
    pub fn with_peer(mut self, peer: SocketAddr) -> Self {
        self.peer = Some(peer);
        self
    }

    async fn read_frame(&mut self) -> Result<Option<Bytes>> {
        loop {
            if let Some(frame) = self.codec.decode(&mut self.read_buf)? {
                trace!(len = frame.len(), "Frame received");
                return Ok(Some(frame));
            }

            let n = self
                .stream
                .read_buf(&mut self.read_buf)
                .await
                .map_err(|e| TransportError::receive_failed(e.to_string()))?;

            if n == 0 {
                if self.read_buf.is_empty() {
                    return Ok(None);
                }
                return Err(TransportError::TruncatedFrame {
                    buffered: self.read_buf.len(),
                });
            }
        }
    }

    async fn write_frame(&mut self, payload: &[u8]) -> Result<()> {
        self.write_buf.clear();
        self.codec.encode(payload, &mut self.write_buf)?;

        self.stream
            .write_all(&self.write_buf)
            .await
            .map_err(|e| TransportError::send_failed(e.to_string()))?;
        self.stream
            .flush()
            .await
            .map_err(|e| TransportError::send_failed(e.to_string()))?;

        trace!(len = payload.len(), "Frame sent");
        Ok(())
    }
}

#[async_trait]
impl<S> MessageStream for FramedConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn recv(&mut self) -> Result<Option<Bytes>> {
        self.read_frame().await
    }

    async fn send(&mut self, payload: &[u8]) -> Result<()> {
        self.write_frame(payload).await
    }

    fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer
    }
}

impl<S> std::fmt::Debug for FramedConnection<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FramedConnection")
            .field("peer", &self.peer)
            .field("buffered", &self.read_buf.len())
            .finish_non_exhaustive()
    }
}

// ============================================
// Tests
// ============================================
