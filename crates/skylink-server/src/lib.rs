// ============================================
// File: crates/skylink-server/src/lib.rs
// ============================================
//! # SkyLink Server Library
//!
//! ## Creation Reason
//! Provides the server side of the SkyLink command channel: the accept
//! loop, the per-connection session state machine, the credential
//! registry and the actuator gateway, plus a programmatic client that
//! speaks the same protocol.
//!
//! ## Main Functionality
//!
//! ### Modules
//! - [`config`]: TOML configuration
//! - [`server`]: Accept loop and lifecycle
//! - [`services`]: Business logic services
//!   - [`services::credentials`]: Identities and password checks
//!   - [`services::session`]: Per-connection state machine
//!   - [`services::actuator`]: Command dispatch to the (simulated) drone
//!   - [`services::connections`]: Active-connection bookkeeping
//! - [`client`]: `CommandClient`
//! - [`error`]: Server-specific error types
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        SkyLink Server                           │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  ┌─────────────┐     ┌─────────────┐     ┌─────────────────┐   │
//! │  │   Config    │────►│   Server    │────►│ ConnectionTracker│  │
//! │  └─────────────┘     │ accept loop │     └─────────────────┘   │
//! │                      └──────┬──────┘                           │
//! │                             │ one task per connection          │
//! │                             ▼                                  │
//! │                    ┌─────────────────┐                         │
//! │                    │ SessionHandler  │                         │
//! │                    └───┬─────────┬───┘                         │
//! │                        │         │                             │
//! │         ┌──────────────┘         └──────────────┐              │
//! │         ▼                                       ▼              │
//! │  ┌──────────────────┐                 ┌──────────────────┐     │
//! │  │CredentialRegistry│                 │ ActuatorGateway  │     │
//! │  └──────────────────┘                 └──────────────────┘     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Configuration changes require restart (no hot-reload)
//! - Registry and server key are immutable once the server is built
//! - Shutdown stops accepting; it does not drain live sessions
//!
//! ## Last Modified
//! v0.1.0 - Initial server library

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod server;
pub mod services;

// Re-export primary types
pub use client::{CommandClient, LoginOutcome, Reply};
pub use config::{KeyExchangeMode, ServerConfig};
pub use error::{Result, ServerError};
pub use server::Server;
