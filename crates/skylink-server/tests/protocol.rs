// ============================================
// File: crates/skylink-server/tests/protocol.rs
// ============================================
//! End-to-end protocol tests over real TCP on an ephemeral port.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use skylink_core::crypto::{KeyPair, PublicKey, RsaOaepChannel, SecureChannel};
use skylink_core::protocol::{
    ACK_MESSAGE_RECEIVED, AUTH_FAILED, AUTH_SUCCESS, DECRYPTION_FAILED,
    INVALID_CREDENTIALS_FORMAT, INVALID_PUBLIC_KEY, TOO_MANY_ATTEMPTS,
};
use skylink_server::services::{
    CredentialRegistry, FlightState, Identity, SimulatedDrone, StoredSecret,
};
use skylink_server::{CommandClient, KeyExchangeMode, LoginOutcome, Reply, Server, ServerConfig};
use skylink_transport::{ConnectionListener, MessageStream};

// ============================================
// Fixtures
// ============================================

/// Index 0: server, 1: user1, 2: pilot, 3: spare client key.
fn keys(index: usize) -> KeyPair {
    static PEMS: OnceLock<Vec<String>> = OnceLock::new();
    let pems = PEMS.get_or_init(|| {
        (0..4)
            .map(|_| KeyPair::generate().unwrap().to_pkcs8_pem().unwrap().as_str().to_owned())
            .collect()
    });
    KeyPair::from_pkcs8_pem(&pems[index]).unwrap()
}

struct TestServer {
    server: Arc<Server>,
    addr: SocketAddr,
}

impl TestServer {
    async fn start(configure: impl FnOnce(&mut ServerConfig)) -> Self {
        let mut config = ServerConfig::default();
        configure(&mut config);

        let mut registry = CredentialRegistry::new();
        registry.register(Identity::new(
            "user1",
            StoredSecret::plain("password1"),
            "operator",
            keys(1),
        ));
        registry.register(Identity::new(
            "pilot",
            StoredSecret::plain("s3cret"),
            "operator",
            keys(2),
        ));

        let server = Arc::new(Server::new(
            config,
            registry,
            keys(0),
            Arc::new(SimulatedDrone::new(Duration::ZERO)),
        ));

        let listener = ConnectionListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr();
        tokio::spawn({
            let server = Arc::clone(&server);
            async move { server.serve(listener).await }
        });

        Self { server, addr }
    }

    async fn client(&self, key_index: usize) -> CommandClient {
        CommandClient::connect(self.addr, keys(key_index)).await.unwrap()
    }

    fn drone_state(&self) -> FlightState {
        self.server.actuator().state()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server.shutdown();
    }
}

// ============================================
// Scenarios
// ============================================

#[tokio::test]
async fn test_login_returns_server_key() {
    let ts = TestServer::start(|_| {}).await;
    let mut client = ts.client(1).await;

    assert_eq!(
        client.login("user1", "password1").await.unwrap(),
        LoginOutcome::Authenticated
    );
    assert_eq!(client.server_key(), Some(ts.server.server_public_key()));
}

#[tokio::test]
async fn test_wrong_password_allows_retry() {
    let ts = TestServer::start(|_| {}).await;
    let mut client = ts.client(1).await;

    assert_eq!(
        client.login("user1", "wrongpass").await.unwrap(),
        LoginOutcome::Rejected(AUTH_FAILED.to_string())
    );
    assert_eq!(
        client.login("user1", "password1").await.unwrap(),
        LoginOutcome::Authenticated
    );
}

#[tokio::test]
async fn test_malformed_login_allows_retry() {
    let ts = TestServer::start(|_| {}).await;
    let mut conn = skylink_transport::connect(ts.addr).await.unwrap();

    for bad in [&b"user1"[..], b"user1,password1,extra", b"", &[0xff, 0xfe]] {
        conn.send(bad).await.unwrap();
        let reply = conn.recv().await.unwrap().unwrap();
        assert_eq!(&reply[..], INVALID_CREDENTIALS_FORMAT.as_bytes());
    }

    conn.send(b"user1,password1\n").await.unwrap();
    assert_eq!(&conn.recv().await.unwrap().unwrap()[..], AUTH_SUCCESS.as_bytes());
    let blob = conn.recv().await.unwrap().unwrap();
    assert_eq!(&PublicKey::from_pem(&blob).unwrap(), ts.server.server_public_key());
}

#[tokio::test]
async fn test_takeoff_is_acknowledged_and_executed() {
    let ts = TestServer::start(|_| {}).await;
    let mut client = ts.client(1).await;
    client.login("user1", "password1").await.unwrap();

    assert_eq!(ts.drone_state(), FlightState::Grounded);
    assert_eq!(
        client.send("takeoff").await.unwrap(),
        Reply::Ack(ACK_MESSAGE_RECEIVED.to_string())
    );
    assert_eq!(ts.drone_state(), FlightState::Airborne);

    // Repeats and unknown text are acknowledged without changing state
    client.send("TAKEOFF").await.unwrap();
    client.send("hello drone").await.unwrap();
    assert_eq!(ts.drone_state(), FlightState::Airborne);

    client.send("  land ").await.unwrap();
    assert_eq!(ts.drone_state(), FlightState::Grounded);
}

#[tokio::test]
async fn test_garbage_ciphertext_keeps_connection() {
    let ts = TestServer::start(|_| {}).await;
    let mut client = ts.client(1).await;
    client.login("user1", "password1").await.unwrap();

    assert_eq!(
        client.send_raw(b"definitely not ciphertext").await.unwrap(),
        Reply::DecryptionFailed
    );
    assert_eq!(client.send_raw(&[0u8; 256]).await.unwrap(), Reply::DecryptionFailed);

    // Encrypted to the wrong key
    let foreign = RsaOaepChannel::new()
        .encrypt_for(keys(3).public_key(), b"takeoff")
        .unwrap();
    assert_eq!(client.send_raw(&foreign).await.unwrap(), Reply::DecryptionFailed);
    assert_eq!(ts.drone_state(), FlightState::Grounded);

    assert_eq!(
        client.send("takeoff").await.unwrap(),
        Reply::Ack(ACK_MESSAGE_RECEIVED.to_string())
    );
    assert_eq!(ts.drone_state(), FlightState::Airborne);
}

#[tokio::test]
async fn test_ack_is_encrypted_for_the_logged_in_identity() {
    let ts = TestServer::start(|_| {}).await;

    // pilot logs in but holds user1's key: acks are addressed to pilot's key
    let mut client = ts.client(1).await;
    client.login("pilot", "s3cret").await.unwrap();
    assert!(client.send("land").await.is_err());
}

// ============================================
// Mutual Key Exchange
// ============================================

#[tokio::test]
async fn test_mutual_mode_uses_shared_key() {
    let ts = TestServer::start(|c| c.security.key_exchange = KeyExchangeMode::Mutual).await;
    let mut client = ts.client(3).await;

    client.login("user1", "password1").await.unwrap();
    client.share_public_key().await.unwrap();

    assert_eq!(
        client.send("takeoff").await.unwrap(),
        Reply::Ack(ACK_MESSAGE_RECEIVED.to_string())
    );
    assert_eq!(ts.drone_state(), FlightState::Airborne);
}

#[tokio::test]
async fn test_mutual_mode_rejects_bad_key() {
    let ts = TestServer::start(|c| c.security.key_exchange = KeyExchangeMode::Mutual).await;
    let mut conn = skylink_transport::connect(ts.addr).await.unwrap();

    conn.send(b"user1,password1").await.unwrap();
    assert_eq!(&conn.recv().await.unwrap().unwrap()[..], AUTH_SUCCESS.as_bytes());
    conn.recv().await.unwrap().unwrap();

    conn.send(b"-----BEGIN PUBLIC KEY-----\nnope\n-----END PUBLIC KEY-----\n")
        .await
        .unwrap();
    assert_eq!(&conn.recv().await.unwrap().unwrap()[..], INVALID_PUBLIC_KEY.as_bytes());
    assert!(conn.recv().await.unwrap().is_none());
}

// ============================================
// Hardening
// ============================================

#[tokio::test]
async fn test_attempt_limit_closes_connection() {
    let ts = TestServer::start(|c| c.auth.max_attempts = 3).await;
    let mut client = ts.client(1).await;

    for _ in 0..2 {
        assert_eq!(
            client.login("user1", "nope").await.unwrap(),
            LoginOutcome::Rejected(AUTH_FAILED.to_string())
        );
    }
    assert_eq!(
        client.login("user1", "nope").await.unwrap(),
        LoginOutcome::Rejected(TOO_MANY_ATTEMPTS.to_string())
    );

    let err = client.login("user1", "password1").await.unwrap_err();
    assert!(err.is_disconnect());
}

#[tokio::test]
async fn test_faulty_connection_does_not_affect_others() {
    let ts = TestServer::start(|_| {}).await;

    let mut good = ts.client(1).await;
    good.login("user1", "password1").await.unwrap();

    // Oversized frame header, then a half-written frame
    let mut raw = tokio::net::TcpStream::connect(ts.addr).await.unwrap();
    tokio::io::AsyncWriteExt::write_all(&mut raw, &u32::MAX.to_le_bytes())
        .await
        .unwrap();
    let mut truncated = tokio::net::TcpStream::connect(ts.addr).await.unwrap();
    tokio::io::AsyncWriteExt::write_all(&mut truncated, &[10, 0, 0, 0, b'u'])
        .await
        .unwrap();
    drop(truncated);

    let mut other = ts.client(2).await;
    assert_eq!(
        other.login("pilot", "s3cret").await.unwrap(),
        LoginOutcome::Authenticated
    );
    assert_eq!(
        good.send("takeoff").await.unwrap(),
        Reply::Ack(ACK_MESSAGE_RECEIVED.to_string())
    );
    assert_eq!(
        other.send("land").await.unwrap(),
        Reply::Ack(ACK_MESSAGE_RECEIVED.to_string())
    );
    assert_eq!(ts.drone_state(), FlightState::Grounded);
    drop(raw);
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let ts = TestServer::start(|_| {}).await;

    let mut a = ts.client(1).await;
    let mut b = ts.client(2).await;
    a.login("user1", "password1").await.unwrap();

    // b is still unauthenticated even though a logged in
    let mut raw = skylink_transport::connect(ts.addr).await.unwrap();
    let ciphertext = RsaOaepChannel::new()
        .encrypt_for(ts.server.server_public_key(), b"takeoff")
        .unwrap();
    raw.send(&ciphertext).await.unwrap();
    assert_eq!(
        &raw.recv().await.unwrap().unwrap()[..],
        INVALID_CREDENTIALS_FORMAT.as_bytes()
    );
    assert_eq!(ts.drone_state(), FlightState::Grounded);

    b.login("pilot", "s3cret").await.unwrap();
    a.send("takeoff").await.unwrap();
    b.send("land").await.unwrap();
    assert_eq!(ts.drone_state(), FlightState::Grounded);
    assert_eq!(
        a.send_raw(DECRYPTION_FAILED.as_bytes()).await.unwrap(),
        Reply::DecryptionFailed
    );
}
