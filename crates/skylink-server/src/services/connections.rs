// ============================================
// File: crates/skylink-server/src/services/connections.rs
// ============================================
//! # Connection Tracker
//!
//! ## Creation Reason
//! The accept loop needs to know how many connections are live to enforce
//! `limits.max_connections`, and shutdown logging wants to list them.
//! Protocol logic never looks here.
//!
//! ## Main Functionality
//! - `ConnectionTracker`: DashMap of live connections plus an atomic count
//! - `ConnectionGuard`: RAII slot; dropping it frees the slot
//!
//! ## ⚠️ Important Note for Next Developer
//! - The slot is reserved with a CAS on `active` before the map insert,
//!   so the limit holds even when many accepts race
//! - The guard must move into the connection task, or the slot is freed
//!   while the session is still running
//!
//! ## Last Modified
//! v0.1.0 - Initial connection tracking

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::trace;

use skylink_common::SessionId;

// ============================================
// ConnectionInfo
// ============================================

/// What the tracker knows about one live connection.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionInfo {
    /// Remote address.
    pub peer: SocketAddr,
    /// When the connection was accepted.
    pub connected_at: Instant,
}

impl ConnectionInfo {
    /// Time since accept.
    #[must_use]
    pub fn age(&self) -> Duration {
        self.connected_at.elapsed()
    }
}

// ============================================
// ConnectionTracker
// ============================================

/// Live-connection registry with a hard cap.
#[derive(Debug)]
pub struct ConnectionTracker {
    connections: DashMap<SessionId, ConnectionInfo>,
    active: AtomicUsize,
    max_connections: usize,
}

impl ConnectionTracker {
    /// Creates a tracker allowing at most `max_connections` live entries.
    #[must_use]
    pub fn new(max_connections: usize) -> Self {
        Self {
            connections: DashMap::new(),
            active: AtomicUsize::new(0),
            max_connections,
        }
    }

    /// Reserves a slot for a new connection.
    ///
    /// Returns `None` if the tracker is full.
    #[must_use]
    pub fn register(self: &Arc<Self>, id: SessionId, peer: SocketAddr) -> Option<ConnectionGuard> {
        self.active
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.max_connections).then_some(n + 1)
            })
            .ok()?;

        self.connections.insert(
            id.clone(),
            ConnectionInfo {
                peer,
                connected_at: Instant::now(),
            },
        );
        trace!(session_id = %id, %peer, "Connection registered");

        Some(ConnectionGuard {
            tracker: Arc::clone(self),
            id,
        })
    }

    /// Number of live connections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    /// Returns `true` if nothing is connected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured cap.
    #[must_use]
    pub const fn max_connections(&self) -> usize {
        self.max_connections
    }

    /// Copy of the current entries.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(SessionId, ConnectionInfo)> {
        self.connections
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    fn release(&self, id: &SessionId) {
        if self.connections.remove(id).is_some() {
            self.active.fetch_sub(1, Ordering::AcqRel);
            trace!(session_id = %id, "Connection released");
        }
    }
}

// ============================================
// ConnectionGuard
// ============================================

/// Holds one tracker slot until dropped.
#[derive(Debug)]
pub struct ConnectionGuard {
    tracker: Arc<ConnectionTracker>,
    id: SessionId,
}

impl ConnectionGuard {
    /// Session this slot belongs to.
    #[must_use]
    pub const fn session_id(&self) -> &SessionId {
        &self.id
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.tracker.release(&self.id);
    }
}

// ============================================
// Tests
// ============================================
