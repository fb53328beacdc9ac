// ============================================
// File: crates/skylink-common/src/lib.rs
// ============================================
//! # SkyLink Common - Shared Utilities Library
//!
//! ## Creation Reason
//! Provides foundational types and errors shared across all SkyLink crates,
//! so the protocol core, transport and server agree on identifiers and
//! error vocabulary.
//!
//! ## Main Functionality
//! - [`types`]: Core type definitions (`SessionId`)
//! - [`error`]: Common error types and result aliases
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              skylink-server                         │
//! │                    │                                │
//! │         ┌──────────┴──────────┐                    │
//! │         ▼                     ▼                    │
//! │   skylink-core  ◄──── skylink-transport            │
//! │         │                     │                    │
//! │         └──────────┬──────────┘                    │
//! │                    ▼                               │
//! │             skylink-common  ◄── You are here      │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - This crate is the foundation - changes affect everything
//! - Keep dependencies minimal
//! - Security-sensitive types must implement Zeroize
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{CommonError, Result};
pub use types::SessionId;
