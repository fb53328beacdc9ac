// ============================================
// File: crates/skylink-transport/src/lib.rs
// ============================================
//! # SkyLink Transport - Network I/O Layer
//!
//! ## Creation Reason
//! Provides the byte-moving half of the command channel: a TCP listener
//! and a framed connection that turns a byte stream into discrete
//! messages using the core frame codec.
//!
//! ## Main Functionality
//!
//! ### Modules
//! - [`traits`]: `MessageStream` abstraction used by the session handler
//! - [`framed`]: `FramedConnection` over any async byte stream
//! - [`tcp`]: `ConnectionListener` and `connect`
//! - [`error`]: Transport-specific error types
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              skylink-server                         │
//! │                    │                                │
//! │         ┌──────────┴──────────┐                    │
//! │         ▼                     ▼                    │
//! │   skylink-core  ◄──── skylink-transport            │
//! │                       You are here ◄──             │
//! │         │                                          │
//! │         ▼                                          │
//! │   skylink-common                                   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Nothing here knows about credentials or encryption; frames are opaque
//! - Session code should depend on `MessageStream`, not on `TcpStream`,
//!   so it can be tested over `tokio::io::duplex`
//!
//! ## Last Modified
//! v0.1.0 - Initial transport layer implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod framed;
pub mod tcp;
pub mod traits;

// Re-export primary types
pub use error::{Result, TransportError};
pub use framed::FramedConnection;
pub use tcp::{connect, ConnectionListener};
pub use traits::MessageStream;
