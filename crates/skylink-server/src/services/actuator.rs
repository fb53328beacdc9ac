// ============================================
// File: crates/skylink-server/src/services/actuator.rs
// ============================================
//! # Actuator Gateway
//!
//! ## Creation Reason
//! Decrypted messages may be commands for the drone. This module is the
//! seam between the protocol and whatever flies: a trait the session
//! calls, and a simulated drone used by the server binary and tests.
//!
//! ## Flight State Machine
//! ```text
//!              takeoff (after transition_delay)
//!   ┌──────────┐ ─────────────────────────────► ┌──────────┐
//!   │ Grounded │                                │ Airborne │
//!   └──────────┘ ◄───────────────────────────── └──────────┘
//!              land (after transition_delay)
//!
//!   takeoff while Airborne / land while Grounded: no change
//!   anything else: "No command recognised.", no change
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Transitions are serialized by an async mutex held across the delay;
//!   two sessions sending `takeoff` together produce one take-off and one
//!   "already flying"
//! - `state()` never waits on a transition in progress
//!
//! ## Last Modified
//! v0.1.0 - Initial actuator gateway

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{debug, info};

use skylink_core::protocol::Command;

// ============================================
// Status Literals
// ============================================

/// Status after a successful take-off.
pub const STATUS_TOOK_OFF: &str = "Drone has taken off successfully!";

/// Status for `takeoff` while already airborne.
pub const STATUS_ALREADY_FLYING: &str = "Drone is already flying.";

/// Status after a successful landing.
pub const STATUS_LANDED: &str = "Drone has landed successfully!";

/// Status for `land` while already grounded.
pub const STATUS_ALREADY_GROUNDED: &str = "Drone is already on the ground.";

/// Status for text outside the command vocabulary.
pub const STATUS_UNRECOGNISED: &str = "No command recognised.";

// ============================================
// FlightState
// ============================================

/// Physical state of the drone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlightState {
    /// On the ground.
    #[default]
    Grounded,
    /// In the air.
    Airborne,
}

impl fmt::Display for FlightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grounded => write!(f, "Grounded"),
            Self::Airborne => write!(f, "Airborne"),
        }
    }
}

// ============================================
// ActuatorGateway Trait
// ============================================

/// Receives decrypted text and acts on recognised commands.
#[async_trait]
pub trait ActuatorGateway: Send + Sync {
    /// Classifies `text` and executes it if it is a command.
    /// Returns a human-readable status.
    async fn dispatch(&self, text: &str) -> String;

    /// Current flight state.
    fn state(&self) -> FlightState;
}

// ============================================
// SimulatedDrone
// ============================================

/// In-process drone that takes `transition_delay` to take off or land.
#[derive(Debug)]
pub struct SimulatedDrone {
    state: RwLock<FlightState>,
    transition: Mutex<()>,
    transition_delay: Duration,
}

impl SimulatedDrone {
    /// Creates a grounded drone.
    #[must_use]
    pub fn new(transition_delay: Duration) -> Self {
        Self {
            state: RwLock::new(FlightState::Grounded),
            transition: Mutex::new(()),
            transition_delay,
        }
    }

    /// Executes one command and returns its status literal.
    pub async fn execute(&self, command: Command) -> &'static str {
        let _transition = self.transition.lock().await;

        let (from, to, done, noop) = match command {
            Command::TakeOff => (
                FlightState::Grounded,
                FlightState::Airborne,
                STATUS_TOOK_OFF,
                STATUS_ALREADY_FLYING,
            ),
            Command::Land => (
                FlightState::Airborne,
                FlightState::Grounded,
                STATUS_LANDED,
                STATUS_ALREADY_GROUNDED,
            ),
        };

        let current = *self.state.read();
        if current != from {
            debug!(%command, state = %current, "Command has no effect");
            return noop;
        }

        tokio::time::sleep(self.transition_delay).await;
        *self.state.write() = to;
        info!(%command, %from, %to, "Flight state changed");
        done
    }
}

impl Default for SimulatedDrone {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

#[async_trait]
impl ActuatorGateway for SimulatedDrone {
    async fn dispatch(&self, text: &str) -> String {
        match Command::parse(text) {
            Some(command) => self.execute(command).await.to_string(),
            None => STATUS_UNRECOGNISED.to_string(),
        }
    }

    fn state(&self) -> FlightState {
        *self.state.read()
    }
}

// ============================================
// Tests
// ============================================
