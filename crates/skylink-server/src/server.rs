// ============================================
// File: crates/skylink-server/src/server.rs
// ============================================
//! # Server Orchestrator
//!
//! ## Creation Reason
//! Wires the registry, server key and actuator together and runs the
//! accept loop that hands each connection to its own session task.
//!
//! ## Main Functionality
//! - `Server`: construction from config and lifecycle management
//! - Accept loop with connection limit
//! - Graceful stop on Ctrl+C or `shutdown()`
//!
//! ## Server Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Server                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  ConnectionListener ──accept──► ConnectionTracker.register  │
//! │                                     │           │           │
//! │                               slot free      limit hit      │
//! │                                     │           │           │
//! │                                     ▼           ▼           │
//! │                       tokio::spawn(SessionHandler)  close   │
//! │                                     │                       │
//! │                 ┌───────────────────┼─────────────────┐     │
//! │                 ▼                   ▼                 ▼     │
//! │        CredentialRegistry    Server KeyPair   ActuatorGateway│
//! │          (Arc, immutable)   (Arc, immutable)   (Arc, mutex)  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - A failing or panicking session only ends its own task
//! - Shutdown stops accepting and drops the listener; live sessions keep
//!   running until their peers disconnect or the runtime exits
//! - Use tokio::select! for concurrent operations
//!
//! ## Last Modified
//! v0.1.0 - Initial server implementation

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use skylink_common::SessionId;
use skylink_core::crypto::{KeyPair, PublicKey, RsaOaepChannel};
use skylink_transport::{ConnectionListener, FramedConnection};

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};
use crate::services::credentials::{generate_key, load_key_file};
use crate::services::{
    ActuatorGateway, ConnectionTracker, CredentialRegistry, SessionContext, SessionHandler,
    SessionPolicy, SimulatedDrone,
};

/// Pause after a failed accept before trying again.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

// ============================================
// Server
// ============================================

/// Main SkyLink server.
///
/// # Lifecycle
/// 1. Build with `Server::from_config(config)` (or `Server::new`)
/// 2. Start with `server.run().await`
/// 3. Stop via Ctrl+C or `server.shutdown()`
pub struct Server {
    /// Server configuration.
    config: ServerConfig,
    /// State shared by every session.
    context: Arc<SessionContext>,
    /// Live connections.
    connections: Arc<ConnectionTracker>,
    /// Shutdown flag.
    shutdown: Arc<AtomicBool>,
    /// Shutdown signal sender.
    shutdown_tx: broadcast::Sender<()>,
}

impl Server {
    /// Creates a server from already-built components.
    pub fn new(
        config: ServerConfig,
        registry: CredentialRegistry,
        server_keys: KeyPair,
        actuator: Arc<dyn ActuatorGateway>,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        let context = Arc::new(SessionContext {
            registry: Arc::new(registry),
            server_keys: Arc::new(server_keys),
            channel: Arc::new(RsaOaepChannel::new()),
            actuator,
            policy: SessionPolicy::from_config(&config),
        });

        Self {
            connections: Arc::new(ConnectionTracker::new(config.limits.max_connections)),
            config,
            context,
            shutdown: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
        }
    }

    /// Builds the registry, server key and simulated drone from config.
    ///
    /// # Errors
    /// Returns error if the config is invalid or a key cannot be loaded
    /// or generated.
    pub async fn from_config(config: ServerConfig) -> Result<Self> {
        config.validate()?;

        let registry = CredentialRegistry::from_config(&config.users).await?;

        let server_keys = match &config.security.server_key_file {
            Some(path) => {
                info!("Loading server key from {}", path.display());
                load_key_file(path).await?
            }
            None => {
                info!("Generating ephemeral server key");
                generate_key().await?
            }
        };
        info!(key = %server_keys.public_key(), "Server key ready");

        let actuator = Arc::new(SimulatedDrone::new(config.actuator.transition_delay()));
        Ok(Self::new(config, registry, server_keys, actuator))
    }

    /// Binds the configured address and serves until shutdown.
    ///
    /// # Errors
    /// Returns `StartupFailed` if the listener cannot be bound.
    pub async fn run(&self) -> Result<()> {
        info!("Starting SkyLink server v{}", env!("CARGO_PKG_VERSION"));

        let listener = ConnectionListener::bind_addr(self.config.listen_addr())
            .await
            .map_err(|e| ServerError::startup_failed(format!("TCP bind failed: {e}")))?;

        tokio::select! {
            result = self.serve(listener) => result?,
            () = wait_for_shutdown() => self.shutdown(),
        }

        info!("Server shutdown complete");
        Ok(())
    }

    /// Accepts connections on `listener` until `shutdown()` is called.
    ///
    /// # Errors
    /// Currently never fails; accept errors are logged and retried.
    pub async fn serve(&self, listener: ConnectionListener) -> Result<()> {
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        if self.shutdown.load(Ordering::SeqCst) {
            return Ok(());
        }

        info!(
            addr = %listener.local_addr(),
            mode = %self.context.policy.key_exchange,
            max_connections = self.connections.max_connections(),
            "Server listening"
        );

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    debug!("Accept loop received shutdown signal");
                    break;
                }
                result = listener.accept() => {
                    match result {
                        Ok((conn, peer)) => {
                            if self.shutdown.load(Ordering::SeqCst) {
                                break;
                            }
                            self.spawn_session(conn, peer);
                        }
                        Err(e) => {
                            if self.shutdown.load(Ordering::SeqCst) {
                                break;
                            }
                            error!("Accept error: {}", e);
                            tokio::time::sleep(ACCEPT_BACKOFF).await;
                        }
                    }
                }
            }
        }

        drop(listener);
        info!(live = self.connections.len(), "Stopped accepting connections");
        for (id, conn) in self.connections.snapshot() {
            debug!(
                session_id = %id,
                peer = %conn.peer,
                age_secs = conn.age().as_secs(),
                "Session still running at shutdown"
            );
        }
        Ok(())
    }

    /// Registers the connection and spawns its session task.
    fn spawn_session(&self, conn: FramedConnection<TcpStream>, peer: SocketAddr) {
        let id = SessionId::generate();
        let Some(guard) = self.connections.register(id.clone(), peer) else {
            warn!(
                %peer,
                max = self.connections.max_connections(),
                "Connection limit reached, closing"
            );
            return;
        };

        info!(session_id = %id, %peer, "Connection accepted");
        let context = Arc::clone(&self.context);

        tokio::spawn(async move {
            let _guard = guard;
            SessionHandler::new(conn, context, id).run().await;
        });
    }

    /// Triggers server shutdown programmatically.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        let _ = self.shutdown_tx.send(());
    }

    /// Number of live connections.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Public half of the server key, as sent to clients.
    #[must_use]
    pub fn server_public_key(&self) -> &PublicKey {
        self.context.server_keys.public_key()
    }

    /// Command sink shared by all sessions.
    #[must_use]
    pub fn actuator(&self) -> &Arc<dyn ActuatorGateway> {
        &self.context.actuator
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &ServerConfig {
        &self.config
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("listen_addr", &self.config.network.listen_addr)
            .field("key_exchange", &self.context.policy.key_exchange)
            .field("identities", &self.context.registry.len())
            .field("connections", &self.connections.len())
            .finish()
    }
}

/// Waits for Ctrl+C. If the handler cannot be installed, waits forever so
/// only `shutdown()` stops the server.
async fn wait_for_shutdown() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal"),
        Err(e) => {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use skylink_core::protocol::AUTH_SUCCESS;
    use skylink_transport::MessageStream;

    use super::*;
    use crate::services::credentials::{Identity, StoredSecret};
    use crate::services::session::tests::test_keys;

    fn server(max_connections: usize) -> Arc<Server> {
        let mut config = ServerConfig::default();
        config.limits.max_connections = max_connections;

        let mut registry = CredentialRegistry::new();
        registry.register(Identity::new(
            "user1",
            StoredSecret::plain("password1"),
            "operator",
            test_keys(1),
        ));

        Arc::new(Server::new(
            config,
            registry,
            test_keys(0),
            Arc::new(SimulatedDrone::new(Duration::ZERO)),
        ))
    }

    #[tokio::test]
    async fn test_shutdown_stops_serve() {
        let server = server(10);
        let listener = ConnectionListener::bind("127.0.0.1:0").await.unwrap();

        let task = tokio::spawn({
            let server = Arc::clone(&server);
            async move { server.serve(listener).await }
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        server.shutdown();

        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_serve_after_shutdown_returns() {
        let server = server(10);
        server.shutdown();

        let listener = ConnectionListener::bind("127.0.0.1:0").await.unwrap();
        server.serve(listener).await.unwrap();
    }

    #[tokio::test]
    async fn test_connection_limit() {
        let server = server(1);
        let listener = ConnectionListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr();

        tokio::spawn({
            let server = Arc::clone(&server);
            async move { server.serve(listener).await }
        });

        let mut first = skylink_transport::connect(addr).await.unwrap();
        first.send(b"user1,password1").await.unwrap();
        assert_eq!(&first.recv().await.unwrap().unwrap()[..], AUTH_SUCCESS.as_bytes());
        assert_eq!(server.connection_count(), 1);

        let mut second = skylink_transport::connect(addr).await.unwrap();
        let reply = second.recv().await;
        assert!(!matches!(reply, Ok(Some(_))));

        drop(first);
        for _ in 0..100 {
            if server.connection_count() == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(server.connection_count(), 0);
        server.shutdown();
    }

    #[test]
    fn test_debug_output() {
        let server = server(3);
        let debug = format!("{server:?}");
        assert!(debug.contains("Server"));
        assert!(debug.contains("identities: 1"));
    }
}
