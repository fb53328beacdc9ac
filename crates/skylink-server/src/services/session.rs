// ============================================
// File: crates/skylink-server/src/services/session.rs
// ============================================
//! # Session Handler
//!
//! ## Creation Reason
//! Runs the per-connection protocol: login, key exchange and the
//! encrypted message loop. One handler per accepted connection, owned by
//! that connection's task.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────┐  frame   ┌────────────────┐
//! │ AwaitingCredentials │ ───────► │ Authenticating │
//! └─────────────────────┘          └───────┬────────┘
//!      ▲   bad format / wrong password      │ match
//!      └────────────────────────────────────┤
//!                                           ▼
//!                                   ┌──────────────┐
//!                                   │ KeyExchange  │ ack + server key
//!                                   └──────┬───────┘ (+ client key, mutual)
//!                                          ▼
//!                                   ┌──────────────┐
//!                                   │ MessageLoop  │ ◄─┐ decrypt, dispatch,
//!                                   └──────┬───────┘ ──┘ encrypted ack
//!                                          │ EOF / error / limit
//!                                          ▼
//!                                   ┌──────────────┐
//!                                   │   Closed     │
//!                                   └──────────────┘
//! ```
//!
//! ## Failure Handling
//! | Failure              | Reply                               | Connection |
//! |----------------------|-------------------------------------|------------|
//! | Bad login format     | "Invalid credentials format. ..."   | stays open |
//! | Wrong credentials    | "Authentication failed!"            | stays open |
//! | Attempt limit hit    | "Too many authentication attempts." | closed     |
//! | Bad client key       | "Invalid public key."               | closed     |
//! | Undecryptable frame  | "Decryption failed!" (plaintext)    | stays open |
//! | Transport error      | none                                | closed     |
//!
//! ## ⚠️ Important Note for Next Developer
//! - Errors never leave `run`; they are logged and end this session only
//! - Messages are handled strictly one at a time, in arrival order
//! - The decrypted text is logged at info level, as the operator console
//!   expects; do not send anything sensitive over this channel
//!
//! ## Last Modified
//! v0.1.0 - Initial session handler

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use tracing::{debug, info, warn};

use skylink_common::SessionId;
use skylink_core::crypto::{KeyPair, PublicKey, SecureChannel};
use skylink_core::protocol::{
    Credentials, ACK_MESSAGE_RECEIVED, AUTH_FAILED, AUTH_SUCCESS, DECRYPTION_FAILED,
    INVALID_CREDENTIALS_FORMAT, INVALID_PUBLIC_KEY, TOO_MANY_ATTEMPTS,
};
use skylink_transport::{MessageStream, TransportError};

use crate::config::{KeyExchangeMode, ServerConfig};
use crate::error::{Result, ServerError};
use crate::services::actuator::ActuatorGateway;
use crate::services::credentials::{CredentialRegistry, Identity};

// ============================================
// Session State
// ============================================

/// Session state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for a `username,password` frame.
    AwaitingCredentials,
    /// Checking a parsed credential pair.
    Authenticating,
    /// Sending the server key (and receiving the client key in mutual mode).
    KeyExchange,
    /// Exchanging encrypted messages.
    MessageLoop,
    /// Connection finished.
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingCredentials => write!(f, "AwaitingCredentials"),
            Self::Authenticating => write!(f, "Authenticating"),
            Self::KeyExchange => write!(f, "KeyExchange"),
            Self::MessageLoop => write!(f, "MessageLoop"),
            Self::Closed => write!(f, "Closed"),
        }
    }
}

// ============================================
// Session Statistics
// ============================================

/// Per-connection counters, reported when the session closes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Rejected login frames (bad format or wrong credentials).
    pub auth_attempts: u32,
    /// Messages decrypted and acknowledged.
    pub messages: u64,
    /// Frames that failed to decrypt.
    pub decrypt_failures: u64,
}

// ============================================
// Session
// ============================================

/// State of one connection. Never shared between tasks.
pub struct Session {
    id: SessionId,
    state: SessionState,
    identity: Option<Arc<Identity>>,
    peer_key: Option<PublicKey>,
    stats: SessionStats,
    created_at: Instant,
}

impl Session {
    /// Creates a session awaiting credentials.
    #[must_use]
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            state: SessionState::AwaitingCredentials,
            identity: None,
            peer_key: None,
            stats: SessionStats::default(),
            created_at: Instant::now(),
        }
    }

    /// Session identifier used in logs.
    #[must_use]
    pub const fn id(&self) -> &SessionId {
        &self.id
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Authenticated identity, once login succeeded.
    #[must_use]
    pub fn identity(&self) -> Option<&Arc<Identity>> {
        self.identity.as_ref()
    }

    /// Key acknowledgments are encrypted to, once key exchange finished.
    #[must_use]
    pub const fn peer_key(&self) -> Option<&PublicKey> {
        self.peer_key.as_ref()
    }

    /// Counters so far.
    #[must_use]
    pub const fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Returns `true` once login succeeded.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Time since the connection was accepted.
    #[must_use]
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            debug!(session_id = %self.id, from = %self.state, to = %next, "Session state change");
            self.state = next;
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("username", &self.identity.as_ref().map(|i| i.username()))
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

// ============================================
// SessionPolicy
// ============================================

/// Protocol knobs taken from configuration.
#[derive(Debug, Clone, Copy)]
pub struct SessionPolicy {
    /// How the acknowledgment key is obtained.
    pub key_exchange: KeyExchangeMode,
    /// Rejected logins allowed before closing (0 = unlimited).
    pub max_attempts: u32,
    /// Delay before each login rejection.
    pub failure_delay: Duration,
    /// Per-read idle timeout; `None` waits forever.
    pub idle_timeout: Option<Duration>,
}

impl SessionPolicy {
    /// Extracts the policy from server configuration.
    #[must_use]
    pub const fn from_config(config: &ServerConfig) -> Self {
        Self {
            key_exchange: config.security.key_exchange,
            max_attempts: config.auth.max_attempts,
            failure_delay: config.auth.failure_delay(),
            idle_timeout: config.limits.idle_timeout(),
        }
    }
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            key_exchange: KeyExchangeMode::ServerOnly,
            max_attempts: 0,
            failure_delay: Duration::ZERO,
            idle_timeout: None,
        }
    }
}

// ============================================
// SessionContext
// ============================================

/// Everything a session needs that outlives it. Shared read-only.
pub struct SessionContext {
    /// Registered identities.
    pub registry: Arc<CredentialRegistry>,
    /// Server key pair; decrypts every client message.
    pub server_keys: Arc<KeyPair>,
    /// Encryption scheme.
    pub channel: Arc<dyn SecureChannel>,
    /// Command sink.
    pub actuator: Arc<dyn ActuatorGateway>,
    /// Protocol knobs.
    pub policy: SessionPolicy,
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("identities", &self.registry.len())
            .field("server_key", self.server_keys.public_key())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

// ============================================
// SessionHandler
// ============================================

/// Drives one connection through the protocol.
pub struct SessionHandler<S> {
    stream: S,
    ctx: Arc<SessionContext>,
    session: Session,
}

impl<S: MessageStream> SessionHandler<S> {
    /// Creates a handler for a freshly accepted stream.
    pub fn new(stream: S, ctx: Arc<SessionContext>, id: SessionId) -> Self {
        Self {
            stream,
            ctx,
            session: Session::new(id),
        }
    }

    /// Session state, for inspection.
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Runs the session to completion. Never fails; errors are logged.
    pub async fn run(mut self) -> SessionStats {
        let peer = self.stream.peer_addr();
        info!(session_id = %self.session.id(), peer = ?peer, "Session started");

        let result = self.drive().await;
        let reached = self.session.state();
        self.session.transition(SessionState::Closed);

        let stats = self.session.stats();
        let username = self.session.identity().map(|i| i.username().to_string());
        match result {
            Ok(()) => info!(
                session_id = %self.session.id(),
                peer = ?peer,
                username = ?username,
                messages = stats.messages,
                decrypt_failures = stats.decrypt_failures,
                auth_attempts = stats.auth_attempts,
                "Session closed"
            ),
            Err(e) if e.is_disconnect() => info!(
                session_id = %self.session.id(),
                peer = ?peer,
                username = ?username,
                state = %reached,
                messages = stats.messages,
                "Session closed by peer: {}",
                e
            ),
            Err(e) => warn!(
                session_id = %self.session.id(),
                peer = ?peer,
                username = ?username,
                state = %reached,
                messages = stats.messages,
                decrypt_failures = stats.decrypt_failures,
                auth_attempts = stats.auth_attempts,
                "Session terminated: {}",
                e
            ),
        }
        stats
    }

    /// Runs the protocol; `Ok(())` means the peer closed cleanly.
    ///
    /// # Errors
    /// Any error that ends the connection.
    pub async fn drive(&mut self) -> Result<()> {
        let Some(identity) = self.authenticate().await? else {
            return Ok(());
        };
        let Some(peer_key) = self.exchange_keys(&identity).await? else {
            return Ok(());
        };
        self.message_loop(&peer_key).await
    }

    // ========================================
    // Phases
    // ========================================

    async fn authenticate(&mut self) -> Result<Option<Arc<Identity>>> {
        loop {
            self.session.transition(SessionState::AwaitingCredentials);
            let Some(frame) = self.recv().await? else {
                return Ok(None);
            };

            let credentials = match parse_login(&frame) {
                Ok(credentials) => credentials,
                Err(e) => {
                    debug!(session_id = %self.session.id(), "Malformed login: {}", e);
                    self.reject(&e).await?;
                    continue;
                }
            };

            self.session.transition(SessionState::Authenticating);
            match self
                .ctx
                .registry
                .authenticate(credentials.username(), credentials.password())
            {
                Ok(identity) => {
                    info!(
                        session_id = %self.session.id(),
                        username = %identity.username(),
                        role = %identity.role(),
                        "Authentication succeeded"
                    );
                    self.session.identity = Some(Arc::clone(&identity));
                    return Ok(Some(identity));
                }
                Err(e) => {
                    warn!(
                        session_id = %self.session.id(),
                        username = %credentials.username(),
                        "Authentication failed"
                    );
                    self.reject(&e).await?;
                }
            }
        }
    }

    async fn exchange_keys(&mut self, identity: &Identity) -> Result<Option<PublicKey>> {
        self.session.transition(SessionState::KeyExchange);

        self.stream.send(AUTH_SUCCESS.as_bytes()).await?;
        let server_key = self.ctx.server_keys.public_bytes()?;
        self.stream.send(&server_key).await?;

        let peer_key = match self.ctx.policy.key_exchange {
            KeyExchangeMode::ServerOnly => identity.public_key().clone(),
            KeyExchangeMode::Mutual => {
                let Some(frame) = self.recv().await? else {
                    return Ok(None);
                };
                match PublicKey::from_pem(&frame) {
                    Ok(key) => key,
                    Err(e) => {
                        warn!(session_id = %self.session.id(), "Client key rejected: {}", e);
                        self.stream.send(INVALID_PUBLIC_KEY.as_bytes()).await?;
                        return Err(e.into());
                    }
                }
            }
        };

        debug!(
            session_id = %self.session.id(),
            mode = %self.ctx.policy.key_exchange,
            peer_key = %peer_key,
            "Key exchange complete"
        );
        self.session.peer_key = Some(peer_key.clone());
        Ok(Some(peer_key))
    }

    async fn message_loop(&mut self, peer_key: &PublicKey) -> Result<()> {
        self.session.transition(SessionState::MessageLoop);

        while let Some(frame) = self.recv().await? {
            let text = match self.ctx.channel.decrypt_text(&self.ctx.server_keys, &frame) {
                Ok(text) => text,
                Err(e) => {
                    self.session.stats.decrypt_failures += 1;
                    warn!(
                        session_id = %self.session.id(),
                        len = frame.len(),
                        "Message rejected: {}",
                        e
                    );
                    self.stream.send(DECRYPTION_FAILED.as_bytes()).await?;
                    continue;
                }
            };

            self.session.stats.messages += 1;
            info!(session_id = %self.session.id(), message = %text, "Message received");

            let status = self.ctx.actuator.dispatch(&text).await;
            info!(
                session_id = %self.session.id(),
                state = %self.ctx.actuator.state(),
                "{}",
                status
            );

            let ack = self
                .ctx
                .channel
                .encrypt_for(peer_key, ACK_MESSAGE_RECEIVED.as_bytes())?;
            self.stream.send(&ack).await?;
        }

        Ok(())
    }

    // ========================================
    // Helpers
    // ========================================

    async fn recv(&mut self) -> Result<Option<Bytes>> {
        match self.ctx.policy.idle_timeout {
            Some(limit) => tokio::time::timeout(limit, self.stream.recv())
                .await
                .map_err(|_| TransportError::timeout(limit))?
                .map_err(Into::into),
            None => Ok(self.stream.recv().await?),
        }
    }

    /// Counts a failed login, waits, then either replies with the literal
    /// for `reason` or ends the session once the attempt limit is reached.
    async fn reject(&mut self, reason: &ServerError) -> Result<()> {
        self.session.stats.auth_attempts = self.session.stats.auth_attempts.saturating_add(1);
        let attempts = self.session.stats.auth_attempts;

        if !self.ctx.policy.failure_delay.is_zero() {
            tokio::time::sleep(self.ctx.policy.failure_delay).await;
        }

        let max = self.ctx.policy.max_attempts;
        if max > 0 && attempts >= max {
            self.stream.send(TOO_MANY_ATTEMPTS.as_bytes()).await?;
            return Err(ServerError::TooManyAttempts { attempts });
        }

        self.stream.send(rejection_literal(reason).as_bytes()).await?;
        Ok(())
    }
}

/// Parses a login frame; any format problem becomes `CredentialFormat`.
fn parse_login(frame: &[u8]) -> Result<Credentials> {
    Credentials::parse(frame).map_err(|e| ServerError::credential_format(e.to_string()))
}

/// Wire reply for a rejected login.
fn rejection_literal(reason: &ServerError) -> &'static str {
    match reason {
        ServerError::CredentialFormat { .. } => INVALID_CREDENTIALS_FORMAT,
        _ => AUTH_FAILED,
    }
}

impl<S> fmt::Debug for SessionHandler<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandler")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::OnceLock;

    use tokio::io::{duplex, DuplexStream};
    use tokio::task::JoinHandle;

    use skylink_core::crypto::RsaOaepChannel;
    use skylink_transport::FramedConnection;

    use super::*;
    use crate::services::actuator::{FlightState, SimulatedDrone};
    use crate::services::credentials::StoredSecret;

    /// Three fixed key pairs, generated once per test binary.
    pub(crate) fn test_keys(index: usize) -> KeyPair {
        static PEMS: OnceLock<Vec<String>> = OnceLock::new();
        let pems = PEMS.get_or_init(|| {
            (0..3)
                .map(|_| KeyPair::generate().unwrap().to_pkcs8_pem().unwrap().to_string())
                .collect()
        });
        KeyPair::from_pkcs8_pem(&pems[index]).unwrap()
    }

    struct Harness {
        client: FramedConnection<DuplexStream>,
        client_keys: KeyPair,
        server_public: PublicKey,
        drone: Arc<SimulatedDrone>,
        task: JoinHandle<SessionStats>,
    }

    fn start(policy: SessionPolicy) -> Harness {
        let mut registry = CredentialRegistry::new();
        registry.register(Identity::new(
            "user1",
            StoredSecret::plain("password1"),
            "operator",
            test_keys(1),
        ));

        let server_keys = test_keys(0);
        let server_public = server_keys.public_key().clone();
        let drone = Arc::new(SimulatedDrone::new(Duration::ZERO));
        let ctx = Arc::new(SessionContext {
            registry: Arc::new(registry),
            server_keys: Arc::new(server_keys),
            channel: Arc::new(RsaOaepChannel::new()),
            actuator: Arc::clone(&drone) as Arc<dyn ActuatorGateway>,
            policy,
        });

        let (a, b) = duplex(4096);
        let handler = SessionHandler::new(FramedConnection::new(b), ctx, SessionId::generate());
        let task = tokio::spawn(handler.run());

        Harness {
            client: FramedConnection::new(a),
            client_keys: test_keys(1),
            server_public,
            drone,
            task,
        }
    }

    async fn recv_text(conn: &mut FramedConnection<DuplexStream>) -> String {
        let frame = conn.recv().await.unwrap().unwrap();
        String::from_utf8(frame.to_vec()).unwrap()
    }

    async fn login(h: &mut Harness) {
        h.client.send(b"user1,password1").await.unwrap();
        assert_eq!(recv_text(&mut h.client).await, AUTH_SUCCESS);
        let blob = h.client.recv().await.unwrap().unwrap();
        assert_eq!(PublicKey::from_pem(&blob).unwrap(), h.server_public);
    }

    #[tokio::test]
    async fn test_login_and_command() {
        let mut h = start(SessionPolicy::default());
        login(&mut h).await;

        let channel = RsaOaepChannel::new();
        let ct = channel.encrypt_for(&h.server_public, b"takeoff").unwrap();
        h.client.send(&ct).await.unwrap();

        let ack = h.client.recv().await.unwrap().unwrap();
        assert_eq!(
            channel.decrypt_text(&h.client_keys, &ack).unwrap(),
            ACK_MESSAGE_RECEIVED
        );
        assert_eq!(h.drone.state(), FlightState::Airborne);

        drop(h.client);
        let stats = h.task.await.unwrap();
        assert_eq!(stats.messages, 1);
        assert_eq!(stats.auth_attempts, 0);
    }

    #[tokio::test]
    async fn test_retry_after_failures() {
        let mut h = start(SessionPolicy::default());

        h.client.send(b"user1").await.unwrap();
        assert_eq!(recv_text(&mut h.client).await, INVALID_CREDENTIALS_FORMAT);

        h.client.send(b"user1,wrongpass").await.unwrap();
        assert_eq!(recv_text(&mut h.client).await, AUTH_FAILED);

        login(&mut h).await;

        drop(h.client);
        assert_eq!(h.task.await.unwrap().auth_attempts, 2);
    }

    #[tokio::test]
    async fn test_decryption_failure_keeps_session() {
        let mut h = start(SessionPolicy::default());
        login(&mut h).await;

        h.client.send(b"garbage").await.unwrap();
        assert_eq!(recv_text(&mut h.client).await, DECRYPTION_FAILED);

        let channel = RsaOaepChannel::new();
        let ct = channel.encrypt_for(&h.server_public, b"hello").unwrap();
        h.client.send(&ct).await.unwrap();
        let ack = h.client.recv().await.unwrap().unwrap();
        assert_eq!(
            channel.decrypt_text(&h.client_keys, &ack).unwrap(),
            ACK_MESSAGE_RECEIVED
        );
        assert_eq!(h.drone.state(), FlightState::Grounded);

        drop(h.client);
        let stats = h.task.await.unwrap();
        assert_eq!(stats.decrypt_failures, 1);
        assert_eq!(stats.messages, 1);
    }

    #[tokio::test]
    async fn test_attempt_limit_closes() {
        let mut h = start(SessionPolicy {
            max_attempts: 2,
            ..SessionPolicy::default()
        });

        h.client.send(b"user1,bad").await.unwrap();
        assert_eq!(recv_text(&mut h.client).await, AUTH_FAILED);
        h.client.send(b"user1,bad").await.unwrap();
        assert_eq!(recv_text(&mut h.client).await, TOO_MANY_ATTEMPTS);

        assert!(h.client.recv().await.unwrap().is_none());
        assert_eq!(h.task.await.unwrap().auth_attempts, 2);
    }

    #[tokio::test]
    async fn test_mutual_key_exchange() {
        let mut h = start(SessionPolicy {
            key_exchange: KeyExchangeMode::Mutual,
            ..SessionPolicy::default()
        });
        login(&mut h).await;

        let fresh = test_keys(2);
        h.client.send(&fresh.public_bytes().unwrap()).await.unwrap();

        let channel = RsaOaepChannel::new();
        let ct = channel.encrypt_for(&h.server_public, b"land").unwrap();
        h.client.send(&ct).await.unwrap();
        let ack = h.client.recv().await.unwrap().unwrap();

        assert_eq!(channel.decrypt_text(&fresh, &ack).unwrap(), ACK_MESSAGE_RECEIVED);
        assert!(channel.decrypt_text(&h.client_keys, &ack).is_err());
    }

    #[tokio::test]
    async fn test_mutual_invalid_key_closes() {
        let mut h = start(SessionPolicy {
            key_exchange: KeyExchangeMode::Mutual,
            ..SessionPolicy::default()
        });
        login(&mut h).await;

        h.client.send(b"not a key").await.unwrap();
        assert_eq!(recv_text(&mut h.client).await, INVALID_PUBLIC_KEY);
        assert!(h.client.recv().await.unwrap().is_none());
        h.task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_delay_precedes_rejection() {
        let delay = Duration::from_secs(5);
        let mut h = start(SessionPolicy {
            failure_delay: delay,
            ..SessionPolicy::default()
        });

        let started = tokio::time::Instant::now();
        h.client.send(b"user1,bad").await.unwrap();
        assert_eq!(recv_text(&mut h.client).await, AUTH_FAILED);
        assert!(started.elapsed() >= delay);

        let started = tokio::time::Instant::now();
        h.client.send(b"user1").await.unwrap();
        assert_eq!(recv_text(&mut h.client).await, INVALID_CREDENTIALS_FORMAT);
        assert!(started.elapsed() >= delay);

        // Success is never delayed
        let started = tokio::time::Instant::now();
        login(&mut h).await;
        assert!(started.elapsed() < delay);
    }

    #[test]
    fn test_malformed_login_is_credential_format() {
        for frame in [&b"user1"[..], b"a,b,c", &[0xff, 0xfe]] {
            let err = parse_login(frame).unwrap_err();
            assert!(matches!(err, ServerError::CredentialFormat { .. }));
            assert!(err.is_recoverable());
            assert_eq!(rejection_literal(&err), INVALID_CREDENTIALS_FORMAT);
        }

        assert_eq!(parse_login(b"user1,password1\n").unwrap().username(), "user1");
        assert_eq!(rejection_literal(&ServerError::AuthenticationFailed), AUTH_FAILED);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_timeout_closes() {
        let mut h = start(SessionPolicy {
            idle_timeout: Some(Duration::from_secs(30)),
            ..SessionPolicy::default()
        });

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert!(h.client.recv().await.unwrap().is_none());
        h.task.await.unwrap();
    }

    #[test]
    fn test_session_initial_state() {
        let session = Session::new(SessionId::generate());
        assert_eq!(session.state(), SessionState::AwaitingCredentials);
        assert!(!session.is_authenticated());
        assert!(session.peer_key().is_none());
        assert_eq!(session.stats(), SessionStats::default());
        assert_eq!(SessionState::MessageLoop.to_string(), "MessageLoop");
    }
}
