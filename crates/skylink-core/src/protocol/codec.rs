// ============================================
// File: crates/skylink-core/src/protocol/codec.rs
// ============================================
//! # Frame Codec
//!
//! ## Creation Reason
//! A byte stream has no message boundaries, and an RSA ciphertext or PEM
//! blob can arrive split across reads. Every SkyLink message is therefore
//! carried in a length-prefixed frame.
//!
//! ## Wire Format
//! ```text
//! ┌──────────────────────┬─────────────────────────────┐
//! │ length: u32 LE (4 B) │ payload (length bytes)      │
//! └──────────────────────┴─────────────────────────────┘
//! ```
//! Zero-length frames are legal.
//!
//! ## Parsing Strategy
//! 1. Wait for the 4-byte header
//! 2. Reject declared lengths above the limit before buffering the payload
//! 3. Wait for the full payload, then split it off without copying
//!
//! ## ⚠️ Important Note for Next Developer
//! - The length check MUST happen before reserving buffer space, or a
//!   peer can make us allocate 4 GiB with one header
//!
//! ## Last Modified
//! v0.1.0 - Initial codec implementation

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{CoreError, Result};

// ============================================
// Constants
// ============================================

/// Size of the length prefix.
pub const FRAME_HEADER_SIZE: usize = 4;

/// Largest payload accepted in one frame (64 KiB).
pub const MAX_FRAME_LEN: usize = 64 * 1024;

// ============================================
// FrameCodec
// ============================================

/// Length-prefixed frame encoder/decoder.
///
/// # Example
/// ```
/// use bytes::BytesMut;
/// use skylink_core::protocol::FrameCodec;
///
/// let codec = FrameCodec::new();
/// let mut buf = BytesMut::new();
/// codec.encode(b"user1,password1", &mut buf).unwrap();
///
/// let frame = codec.decode(&mut buf).unwrap().unwrap();
/// assert_eq!(&frame[..], b"user1,password1");
/// assert!(buf.is_empty());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FrameCodec {
    max_frame_len: usize,
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameCodec {
    /// Creates a codec with the default 64 KiB limit.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_frame_len: MAX_FRAME_LEN,
        }
    }

    /// Creates a codec with a custom payload limit.
    #[must_use]
    pub const fn with_max_frame_len(max_frame_len: usize) -> Self {
        Self { max_frame_len }
    }

    /// Payload limit in bytes.
    #[must_use]
    pub const fn max_frame_len(&self) -> usize {
        self.max_frame_len
    }

    /// Appends one frame carrying `payload` to `buf`.
    ///
    /// # Errors
    /// Returns `MessageTooLarge` if the payload exceeds the limit.
    pub fn encode(&self, payload: &[u8], buf: &mut BytesMut) -> Result<()> {
        if payload.len() > self.max_frame_len {
            return Err(CoreError::too_large(self.max_frame_len, payload.len()));
        }
        let len = u32::try_from(payload.len())
            .map_err(|_| CoreError::too_large(self.max_frame_len, payload.len()))?;

        buf.reserve(FRAME_HEADER_SIZE + payload.len());
        buf.put_u32_le(len);
        buf.put_slice(payload);
        Ok(())
    }

    /// Checks whether `buf` starts with a complete frame.
    ///
    /// # Returns
    /// - `Ok(Some(len))` - Complete frame of `len` bytes including header
    /// - `Ok(None)` - Incomplete frame, need more data
    /// - `Err(_)` - Declared length exceeds the limit
    ///
    /// # Errors
    /// Returns `MessageTooLarge` for an oversized declared length.
    pub fn check_complete(&self, buf: &[u8]) -> Result<Option<usize>> {
        let Some(header) = buf.get(..FRAME_HEADER_SIZE) else {
            return Ok(None);
        };

        let mut header = header;
        let declared = header.get_u32_le() as usize;
        if declared > self.max_frame_len {
            return Err(CoreError::too_large(self.max_frame_len, declared));
        }

        let required = FRAME_HEADER_SIZE + declared;
        if buf.len() >= required {
            Ok(Some(required))
        } else {
            Ok(None)
        }
    }

    /// Removes one complete frame from the front of `buf`.
    ///
    /// Leaves `buf` untouched and returns `Ok(None)` until a full frame is
    /// buffered. Reserves room for the rest of a partial frame.
    ///
    /// # Errors
    /// Returns `MessageTooLarge` for an oversized declared length.
    pub fn decode(&self, buf: &mut BytesMut) -> Result<Option<Bytes>> {
        match self.check_complete(buf)? {
            Some(total) => {
                buf.advance(FRAME_HEADER_SIZE);
                Ok(Some(buf.split_to(total - FRAME_HEADER_SIZE).freeze()))
            }
            None => {
                if buf.len() >= FRAME_HEADER_SIZE {
                    let declared = (&buf[..FRAME_HEADER_SIZE]).get_u32_le() as usize;
                    buf.reserve(FRAME_HEADER_SIZE + declared - buf.len());
                }
                Ok(None)
            }
        }
    }
}

// ============================================
// Tests
// ============================================
