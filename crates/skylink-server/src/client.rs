// ============================================
// File: crates/skylink-server/src/client.rs
// ============================================
//! # Command Client
//!
//! ## Creation Reason
//! Programmatic client for the SkyLink command channel, used by the
//! `send` subcommand and the integration tests.
//!
//! ## Main Functionality
//! - `CommandClient::connect`: TCP + framing
//! - `login`: credential exchange, then reads the server key
//! - `share_public_key`: mutual key exchange mode only
//! - `send`: encrypts text to the server key and reads the acknowledgment
//!
//! ## Usage
//! ```text
//! connect ──► login ──► [share_public_key] ──► send ... send
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - `keys` must be the identity key the server has on file (server-only
//!   mode) or the key shared via `share_public_key` (mutual mode),
//!   otherwise acknowledgments cannot be decrypted
//! - Payloads over one OAEP block are rejected locally before sending
//!
//! ## Last Modified
//! v0.1.0 - Initial client

use std::net::SocketAddr;

use bytes::Bytes;
use tokio::net::TcpStream;
use tracing::debug;

use skylink_core::crypto::{KeyPair, PublicKey, RsaOaepChannel, SecureChannel};
use skylink_core::protocol::{Credentials, AUTH_SUCCESS, DECRYPTION_FAILED};
use skylink_transport::{FramedConnection, MessageStream, TransportError};

use crate::error::{Result, ServerError};

// ============================================
// Outcomes
// ============================================

/// Result of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Server accepted the credentials and sent its key.
    Authenticated,
    /// Server replied with something else; the literal is kept.
    Rejected(String),
}

/// Server reply to one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Decrypted acknowledgment text.
    Ack(String),
    /// Server could not decrypt the message.
    DecryptionFailed,
}

// ============================================
// CommandClient
// ============================================

/// Client side of one SkyLink connection.
pub struct CommandClient<S = FramedConnection<TcpStream>> {
    stream: S,
    keys: KeyPair,
    server_key: Option<PublicKey>,
    channel: RsaOaepChannel,
}

impl CommandClient {
    /// Connects to a server.
    ///
    /// # Errors
    /// Returns `Transport(ConnectFailed)` if the connection fails.
    pub async fn connect(addr: SocketAddr, keys: KeyPair) -> Result<Self> {
        let stream = skylink_transport::connect(addr).await?;
        Ok(Self::new(stream, keys))
    }
}

impl<S: MessageStream> CommandClient<S> {
    /// Wraps an established stream.
    pub fn new(stream: S, keys: KeyPair) -> Self {
        Self {
            stream,
            keys,
            server_key: None,
            channel: RsaOaepChannel::new(),
        }
    }

    /// Sends a credential pair. On success the server key is read and kept.
    ///
    /// # Errors
    /// - `Core(MalformedMessage)`: a field contains the separator
    /// - `Core(InvalidPublicKey)`: the server sent an unusable key
    /// - `Transport`: the connection failed or closed
    pub async fn login(&mut self, username: &str, password: &str) -> Result<LoginOutcome> {
        let credentials = Credentials::new(username, password)?;
        self.stream.send(credentials.to_line().as_bytes()).await?;

        let reply = self.recv_frame().await?;
        if &reply[..] != AUTH_SUCCESS.as_bytes() {
            let text = String::from_utf8_lossy(&reply).into_owned();
            debug!(username, reply = %text, "Login rejected");
            return Ok(LoginOutcome::Rejected(text));
        }

        let blob = self.recv_frame().await?;
        let server_key = PublicKey::from_pem(&blob)?;
        debug!(username, server_key = %server_key, "Logged in");
        self.server_key = Some(server_key);
        Ok(LoginOutcome::Authenticated)
    }

    /// Sends this client's public key (mutual key exchange mode).
    ///
    /// # Errors
    /// `NotAuthenticated` before a successful login, or a transport error.
    pub async fn share_public_key(&mut self) -> Result<()> {
        if self.server_key.is_none() {
            return Err(ServerError::NotAuthenticated);
        }
        let blob = self.keys.public_bytes()?;
        self.stream.send(&blob).await?;
        Ok(())
    }

    /// Encrypts `text` to the server key, sends it and reads the reply.
    ///
    /// # Errors
    /// - `NotAuthenticated`: no server key yet
    /// - `Core(PlaintextTooLarge)`: text does not fit one block
    /// - `Core(Decryption)`: the acknowledgment is not for `keys`
    pub async fn send(&mut self, text: &str) -> Result<Reply> {
        let server_key = self.server_key.as_ref().ok_or(ServerError::NotAuthenticated)?;
        let ciphertext = self.channel.encrypt_for(server_key, text.as_bytes())?;
        self.send_raw(&ciphertext).await
    }

    /// Sends `payload` unmodified and reads the reply.
    ///
    /// # Errors
    /// Same as [`CommandClient::send`], minus the encryption step.
    pub async fn send_raw(&mut self, payload: &[u8]) -> Result<Reply> {
        self.stream.send(payload).await?;

        let frame = self.recv_frame().await?;
        if &frame[..] == DECRYPTION_FAILED.as_bytes() {
            return Ok(Reply::DecryptionFailed);
        }
        let text = self.channel.decrypt_text(&self.keys, &frame)?;
        Ok(Reply::Ack(text))
    }

    /// Reads the next frame.
    ///
    /// # Errors
    /// `Transport(ConnectionClosed)` if the server closed the connection.
    pub async fn recv_frame(&mut self) -> Result<Bytes> {
        self.stream
            .recv()
            .await?
            .ok_or(ServerError::Transport(TransportError::ConnectionClosed))
    }

    /// Server key received at login.
    #[must_use]
    pub const fn server_key(&self) -> Option<&PublicKey> {
        self.server_key.as_ref()
    }

    /// This client's key pair.
    #[must_use]
    pub const fn keys(&self) -> &KeyPair {
        &self.keys
    }
}

impl<S> std::fmt::Debug for CommandClient<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandClient")
            .field("keys", &self.keys)
            .field("server_key", &self.server_key)
            .finish_non_exhaustive()
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use tokio::io::duplex;

    use skylink_core::protocol::{ACK_MESSAGE_RECEIVED, AUTH_FAILED};

    use super::*;
    use crate::services::session::tests::test_keys;

    #[tokio::test]
    async fn test_login_and_send_against_scripted_peer() {
        let (a, b) = duplex(4096);
        let mut client = CommandClient::new(FramedConnection::new(a), test_keys(1));
        let mut peer = FramedConnection::new(b);

        let server = tokio::spawn(async move {
            let server_keys = test_keys(0);
            let client_public = test_keys(1).public_key().clone();
            let channel = RsaOaepChannel::new();

            assert_eq!(&peer.recv().await.unwrap().unwrap()[..], b"user1,wrongpass");
            peer.send(AUTH_FAILED.as_bytes()).await.unwrap();

            assert_eq!(&peer.recv().await.unwrap().unwrap()[..], b"user1,password1");
            peer.send(AUTH_SUCCESS.as_bytes()).await.unwrap();
            peer.send(&server_keys.public_bytes().unwrap()).await.unwrap();

            let frame = peer.recv().await.unwrap().unwrap();
            assert_eq!(channel.decrypt_text(&server_keys, &frame).unwrap(), "takeoff");
            let ack = channel
                .encrypt_for(&client_public, ACK_MESSAGE_RECEIVED.as_bytes())
                .unwrap();
            peer.send(&ack).await.unwrap();

            peer.recv().await.unwrap().unwrap();
            peer.send(DECRYPTION_FAILED.as_bytes()).await.unwrap();
        });

        assert_eq!(
            client.login("user1", "wrongpass").await.unwrap(),
            LoginOutcome::Rejected(AUTH_FAILED.to_string())
        );
        assert!(client.server_key().is_none());

        assert_eq!(
            client.login("user1", "password1").await.unwrap(),
            LoginOutcome::Authenticated
        );
        assert_eq!(client.server_key(), Some(test_keys(0).public_key()));

        assert_eq!(
            client.send("takeoff").await.unwrap(),
            Reply::Ack(ACK_MESSAGE_RECEIVED.to_string())
        );
        assert_eq!(client.send_raw(b"garbage").await.unwrap(), Reply::DecryptionFailed);

        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_send_requires_login() {
        let (a, _b) = duplex(1024);
        let mut client = CommandClient::new(FramedConnection::new(a), test_keys(1));

        assert!(matches!(
            client.send("takeoff").await,
            Err(ServerError::NotAuthenticated)
        ));
        assert!(matches!(
            client.share_public_key().await,
            Err(ServerError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_login_rejects_separator_locally() {
        let (a, _b) = duplex(1024);
        let mut client = CommandClient::new(FramedConnection::new(a), test_keys(1));
        assert!(client.login("us,er", "pw").await.is_err());
    }

    #[tokio::test]
    async fn test_closed_connection() {
        let (a, b) = duplex(1024);
        let mut client = CommandClient::new(FramedConnection::new(a), test_keys(1));
        drop(b);

        let err = client.login("user1", "password1").await.unwrap_err();
        assert!(err.is_disconnect());
    }
}
