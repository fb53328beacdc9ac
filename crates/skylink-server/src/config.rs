// ============================================
// File: crates/skylink-server/src/config.rs
// ============================================
//! # Server Configuration
//!
//! ## Creation Reason
//! Provides configuration management for the SkyLink server from a TOML
//! file, with defaults that let the server start without one.
//!
//! ## Main Functionality
//! - `ServerConfig`: Main configuration structure
//! - TOML file loading and parsing
//! - Configuration validation
//! - Default values (single `user1` operator on 127.0.0.1:5000)
//!
//! ## Configuration Sections
//! - `network`: TCP listen address
//! - `security`: Key exchange mode, optional server key file
//! - `auth`: Login attempt limit and failure delay
//! - `limits`: Connection limit and idle timeout
//! - `actuator`: Simulated drone timing
//! - `logging`: Log level
//! - `users`: Registered identities
//!
//! ## Example Configuration
//! ```toml
//! [network]
//! listen_addr = "127.0.0.1:5000"
//!
//! [security]
//! key_exchange = "server-only"
//!
//! [auth]
//! max_attempts = 5
//! failure_delay_ms = 500
//!
//! [[users]]
//! username = "user1"
//! password_hash = "<salt-hex>$<sha256-hex>"
//! role = "operator"
//! private_key_file = "/etc/skylink/user1.pem"
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - All config changes require server restart
//! - Validate config before server startup
//! - Usernames and plaintext passwords cannot contain ',' (the login
//!   line separator); validation rejects them
//!
//! ## Last Modified
//! v0.1.0 - Initial configuration implementation

use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use skylink_core::crypto::PasswordHash;
use skylink_core::protocol::messages::CREDENTIAL_SEPARATOR;

use crate::error::{Result, ServerError};

// ============================================
// ServerConfig
// ============================================

/// Main server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Network configuration.
    #[serde(default)]
    pub network: NetworkConfig,

    /// Key handling configuration.
    #[serde(default)]
    pub security: SecurityConfig,

    /// Login policy.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Resource limits.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Actuator configuration.
    #[serde(default)]
    pub actuator: ActuatorConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Registered identities.
    #[serde(default = "default_users")]
    pub users: Vec<UserConfig>,
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    /// Returns error if file cannot be read, parsed or validated.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        info!("Loading configuration from: {}", path_str);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ServerError::config_load(&path_str, e.to_string()))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ServerError::config_load(&path_str, e.to_string()))?;

        config.validate()?;

        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Loads configuration from a string (useful for testing).
    ///
    /// # Errors
    /// Returns error if the string cannot be parsed or validated.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ServerError::config_load("<string>", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns `ConfigInvalid` naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        self.network.validate()?;
        self.limits.validate()?;
        self.logging.validate()?;

        if self.users.is_empty() {
            return Err(ServerError::config_invalid(
                "users",
                "at least one user is required",
            ));
        }
        for (index, user) in self.users.iter().enumerate() {
            user.validate(index)?;
        }

        Ok(())
    }

    /// Serializes configuration to TOML string.
    #[must_use]
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Returns listen address.
    #[must_use]
    pub const fn listen_addr(&self) -> SocketAddr {
        self.network.listen_addr
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            security: SecurityConfig::default(),
            auth: AuthConfig::default(),
            limits: LimitsConfig::default(),
            actuator: ActuatorConfig::default(),
            logging: LoggingConfig::default(),
            users: default_users(),
        }
    }
}

// ============================================
// NetworkConfig
// ============================================

/// Network configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// TCP listen address.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 5000))
}

impl NetworkConfig {
    fn validate(&self) -> Result<()> {
        if self.listen_addr.port() == 0 {
            return Err(ServerError::config_invalid(
                "network.listen_addr",
                "port cannot be 0",
            ));
        }
        Ok(())
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

// ============================================
// SecurityConfig
// ============================================

/// How the client's acknowledgment key is established.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyExchangeMode {
    /// Only the server key is sent; acks use the identity's provisioned key.
    #[default]
    ServerOnly,
    /// The client sends its own public key after receiving the server's.
    Mutual,
}

impl fmt::Display for KeyExchangeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServerOnly => write!(f, "server-only"),
            Self::Mutual => write!(f, "mutual"),
        }
    }
}

/// Key handling configuration section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Key exchange mode.
    #[serde(default)]
    pub key_exchange: KeyExchangeMode,

    /// PKCS#8 PEM file holding the server key. Generated at startup if unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_key_file: Option<PathBuf>,
}

// ============================================
// AuthConfig
// ============================================

/// Login policy section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Failed logins allowed per connection before it is closed (0 = unlimited).
    #[serde(default)]
    pub max_attempts: u32,

    /// Delay before each rejection, in milliseconds.
    #[serde(default)]
    pub failure_delay_ms: u64,
}

impl AuthConfig {
    /// Delay before each rejection.
    #[must_use]
    pub const fn failure_delay(&self) -> Duration {
        Duration::from_millis(self.failure_delay_ms)
    }
}

// ============================================
// LimitsConfig
// ============================================

/// Resource limits configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum concurrent connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,

    /// Seconds a connection may sit idle between frames (0 disables).
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

fn default_max_connections() -> usize {
    1000
}

fn default_idle_timeout() -> u64 {
    300
}

impl LimitsConfig {
    fn validate(&self) -> Result<()> {
        if self.max_connections == 0 {
            return Err(ServerError::config_invalid(
                "limits.max_connections",
                "must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Idle timeout, or `None` when disabled.
    #[must_use]
    pub const fn idle_timeout(&self) -> Option<Duration> {
        if self.idle_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.idle_timeout_secs))
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            idle_timeout_secs: default_idle_timeout(),
        }
    }
}

// ============================================
// ActuatorConfig
// ============================================

/// Actuator configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActuatorConfig {
    /// Simulated take-off / landing duration in milliseconds.
    #[serde(default = "default_transition_delay")]
    pub transition_delay_ms: u64,
}

fn default_transition_delay() -> u64 {
    2000
}

impl ActuatorConfig {
    /// Simulated transition duration.
    #[must_use]
    pub const fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_delay_ms)
    }
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            transition_delay_ms: default_transition_delay(),
        }
    }
}

// ============================================
// LoggingConfig
// ============================================

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl LoggingConfig {
    fn validate(&self) -> Result<()> {
        if self.level.trim().is_empty() {
            return Err(ServerError::config_invalid("logging.level", "cannot be empty"));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ============================================
// UserConfig
// ============================================

/// One registered identity.
#[derive(Clone, Serialize, Deserialize)]
pub struct UserConfig {
    /// Login name.
    pub username: String,

    /// Plaintext password. Mutually exclusive with `password_hash`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Salted digest from `skylink-server hash-password`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,

    /// Free-form role label.
    #[serde(default = "default_role")]
    pub role: String,

    /// PKCS#8 PEM file holding this identity's key pair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key_file: Option<PathBuf>,
}

fn default_role() -> String {
    "operator".to_string()
}

fn default_users() -> Vec<UserConfig> {
    vec![UserConfig {
        username: "user1".to_string(),
        password: Some("password1".to_string()),
        password_hash: None,
        role: default_role(),
        private_key_file: None,
    }]
}

impl UserConfig {
    fn validate(&self, index: usize) -> Result<()> {
        let field = |name: &str| format!("users[{index}].{name}");

        if self.username.is_empty() {
            return Err(ServerError::config_invalid(field("username"), "cannot be empty"));
        }
        if self.username.contains(CREDENTIAL_SEPARATOR) {
            return Err(ServerError::config_invalid(field("username"), "cannot contain ','"));
        }

        match (&self.password, &self.password_hash) {
            (Some(_), Some(_)) => Err(ServerError::config_invalid(
                field("password"),
                "set either password or password_hash, not both",
            )),
            (None, None) => Err(ServerError::config_invalid(
                field("password"),
                "password or password_hash is required",
            )),
            (Some(password), None) => {
                if password.contains(CREDENTIAL_SEPARATOR) {
                    return Err(ServerError::config_invalid(
                        field("password"),
                        "cannot contain ','",
                    ));
                }
                Ok(())
            }
            (None, Some(hash)) => hash
                .parse::<PasswordHash>()
                .map(|_| ())
                .map_err(|e| ServerError::config_invalid(field("password_hash"), e.to_string())),
        }
    }
}

impl fmt::Debug for UserConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserConfig")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("password_hash", &self.password_hash.as_ref().map(|_| "[REDACTED]"))
            .field("role", &self.role)
            .field("private_key_file", &self.private_key_file)
            .finish()
    }
}

// ============================================
// Tests
// ============================================
