// ============================================
// File: crates/skylink-server/src/services/mod.rs
// ============================================
//! # Server Services
//!
//! ## Creation Reason
//! Provides business logic services for the SkyLink server, separated
//! from socket handling.
//!
//! ## Main Functionality
//!
//! ### Submodules
//! - [`credentials`]: Identity registry and password checks
//! - [`session`]: Per-connection state machine
//! - [`actuator`]: Command dispatch and the simulated drone
//! - [`connections`]: Active-connection bookkeeping
//!
//! ## Service Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Service Layer                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  ┌──────────────────┐      ┌──────────────────────────────┐ │
//! │  │ SessionHandler   │─────►│ CredentialRegistry           │ │
//! │  │  - login loop    │      │  - immutable after startup   │ │
//! │  │  - key exchange  │      └──────────────────────────────┘ │
//! │  │  - message loop  │      ┌──────────────────────────────┐ │
//! │  │                  │─────►│ ActuatorGateway              │ │
//! │  └──────────────────┘      │  - serialized transitions    │ │
//! │                            └──────────────────────────────┘ │
//! │  ┌──────────────────┐                                       │
//! │  │ConnectionTracker │  (server loop only, never protocol)   │
//! │  └──────────────────┘                                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Sessions are owned by their connection task and never shared
//! - Registry and actuator must stay `Send + Sync`
//!
//! ## Last Modified
//! v0.1.0 - Initial services structure

pub mod actuator;
pub mod connections;
pub mod credentials;
pub mod session;

// Re-export primary types
pub use actuator::{ActuatorGateway, FlightState, SimulatedDrone};
pub use connections::{ConnectionGuard, ConnectionInfo, ConnectionTracker};
pub use credentials::{CredentialRegistry, Identity, StoredSecret};
pub use session::{Session, SessionContext, SessionHandler, SessionPolicy, SessionState, SessionStats};
