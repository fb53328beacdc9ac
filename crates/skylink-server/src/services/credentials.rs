// ============================================
// File: crates/skylink-server/src/services/credentials.rs
// ============================================
//! # Credential Registry
//!
//! ## Creation Reason
//! Holds the identities allowed to log in and answers "does this
//! username/password pair match one of them".
//!
//! ## Main Functionality
//! - `Identity`: username, stored secret, role and key pair
//! - `StoredSecret`: plaintext or salted digest, compared in constant time
//! - `CredentialRegistry`: built once from config, read-only afterwards
//!
//! ## Identity Keys
//! ```text
//! private_key_file set ──► read PKCS#8 PEM ──► KeyPair
//! private_key_file unset ─► generate RSA-2048 (blocking pool)
//! ```
//! The public half encrypts acknowledgments for that user in
//! server-only key exchange mode.
//!
//! ## ⚠️ Important Note for Next Developer
//! - The registry is shared as `Arc<CredentialRegistry>` with no lock;
//!   adding runtime mutation needs a single-writer discipline first
//! - Plaintext passwords are accepted but logged as a warning at startup
//!
//! ## Last Modified
//! v0.1.0 - Initial credential registry

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use skylink_core::crypto::{KeyPair, PasswordHash, PublicKey};

use crate::config::UserConfig;
use crate::error::{Result, ServerError};

// ============================================
// StoredSecret
// ============================================

/// Password material held for one identity.
#[derive(Clone)]
pub enum StoredSecret {
    /// Exact plaintext, compared in constant time.
    Plain(Zeroizing<String>),
    /// Salted SHA-256 digest.
    Hashed(PasswordHash),
}

impl StoredSecret {
    /// Wraps a plaintext password.
    pub fn plain(password: impl Into<String>) -> Self {
        Self::Plain(Zeroizing::new(password.into()))
    }

    /// Returns `true` if `candidate` matches.
    #[must_use]
    pub fn verify(&self, candidate: &str) -> bool {
        match self {
            Self::Plain(stored) => stored.as_bytes().ct_eq(candidate.as_bytes()).into(),
            Self::Hashed(hash) => hash.verify(candidate),
        }
    }

    /// Returns `true` for plaintext secrets.
    #[must_use]
    pub const fn is_plaintext(&self) -> bool {
        matches!(self, Self::Plain(_))
    }
}

impl fmt::Debug for StoredSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(_) => f.write_str("Plain([REDACTED])"),
            Self::Hashed(_) => f.write_str("Hashed([REDACTED])"),
        }
    }
}

// ============================================
// Identity
// ============================================

/// A registered user: credentials, role and key pair.
pub struct Identity {
    username: String,
    secret: StoredSecret,
    role: String,
    keys: KeyPair,
}

impl Identity {
    /// Creates an identity.
    pub fn new(
        username: impl Into<String>,
        secret: StoredSecret,
        role: impl Into<String>,
        keys: KeyPair,
    ) -> Self {
        Self {
            username: username.into(),
            secret,
            role: role.into(),
            keys,
        }
    }

    /// Login name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Role label.
    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Public half of the identity key; acknowledgments are encrypted to it.
    #[must_use]
    pub const fn public_key(&self) -> &PublicKey {
        self.keys.public_key()
    }

    /// Checks a candidate password.
    #[must_use]
    pub fn verify(&self, password: &str) -> bool {
        self.secret.verify(password)
    }

    /// Returns `true` if the password is stored in plaintext.
    #[must_use]
    pub const fn has_plaintext_password(&self) -> bool {
        self.secret.is_plaintext()
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("username", &self.username)
            .field("role", &self.role)
            .field("public_key", self.keys.public_key())
            .finish_non_exhaustive()
    }
}

// ============================================
// CredentialRegistry
// ============================================

/// Immutable set of identities, searched in registration order.
#[derive(Debug, Default)]
pub struct CredentialRegistry {
    identities: Vec<Arc<Identity>>,
}

impl CredentialRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the registry from `[[users]]` entries.
    ///
    /// # Errors
    /// - `ConfigInvalid`: a password hash does not parse
    /// - `StartupFailed`: a key file cannot be read or key generation fails
    pub async fn from_config(users: &[UserConfig]) -> Result<Self> {
        let mut registry = Self::new();

        for user in users {
            let secret = match (&user.password, &user.password_hash) {
                (_, Some(hash)) => StoredSecret::Hashed(hash.parse().map_err(|e| {
                    ServerError::config_invalid(
                        format!("users.{}.password_hash", user.username),
                        format!("{e}"),
                    )
                })?),
                (Some(password), None) => StoredSecret::plain(password.clone()),
                (None, None) => {
                    return Err(ServerError::config_invalid(
                        format!("users.{}.password", user.username),
                        "password or password_hash is required",
                    ))
                }
            };

            let keys = match &user.private_key_file {
                Some(path) => load_key_file(path).await?,
                None => generate_key().await?,
            };

            for warning in provisioning_warnings(user) {
                warn!(username = %user.username, "{}", warning);
            }

            registry.register(Identity::new(
                user.username.clone(),
                secret,
                user.role.clone(),
                keys,
            ));
        }

        info!(identities = registry.len(), "Credential registry ready");
        Ok(registry)
    }

    /// Adds an identity. Later entries never shadow earlier ones.
    pub fn register(&mut self, identity: Identity) {
        debug!(
            username = %identity.username(),
            role = %identity.role(),
            key = %identity.public_key(),
            "Identity registered"
        );
        self.identities.push(Arc::new(identity));
    }

    /// Checks a credential pair. The first identity whose username and
    /// password both match wins.
    ///
    /// # Errors
    /// Returns `AuthenticationFailed` if nothing matches.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Arc<Identity>> {
        self.identities
            .iter()
            .find(|identity| identity.username() == username && identity.verify(password))
            .map(Arc::clone)
            .ok_or(ServerError::AuthenticationFailed)
    }

    /// Number of registered identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.identities.len()
    }

    /// Returns `true` if no identity is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    /// Registered usernames in order.
    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.identities.iter().map(|identity| identity.username())
    }
}

/// Startup warnings for one `[[users]]` entry.
fn provisioning_warnings(user: &UserConfig) -> Vec<&'static str> {
    let mut warnings = Vec::new();
    if user.password_hash.is_none() {
        warnings.push("Password stored in plaintext; consider password_hash");
    }
    if user.private_key_file.is_none() {
        warnings.push(
            "No private_key_file; the generated key is unknown to clients, so \
             acknowledgments are only readable in mutual key exchange mode",
        );
    }
    warnings
}

// ============================================
// Key Helpers
// ============================================

/// Reads a PKCS#8 PEM key file.
///
/// # Errors
/// Returns `StartupFailed` if the file is unreadable or not a valid key.
pub async fn load_key_file(path: &Path) -> Result<KeyPair> {
    let pem = Zeroizing::new(tokio::fs::read_to_string(path).await.map_err(|e| {
        ServerError::startup_failed(format!("reading key file {}: {e}", path.display()))
    })?);

    KeyPair::from_pkcs8_pem(&pem).map_err(|e| {
        ServerError::startup_failed(format!("parsing key file {}: {e}", path.display()))
    })
}

/// Generates an RSA key pair on the blocking pool.
///
/// # Errors
/// Returns `StartupFailed` if generation fails or the task panics.
pub async fn generate_key() -> Result<KeyPair> {
    tokio::task::spawn_blocking(KeyPair::generate)
        .await
        .map_err(|e| ServerError::internal(format!("key generation task: {e}")))?
        .map_err(|e| ServerError::startup_failed(e.to_string()))
}

// ============================================
// Tests
// ============================================
