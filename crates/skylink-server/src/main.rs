// ============================================
// File: crates/skylink-server/src/main.rs
// ============================================
//! # SkyLink Server Entry Point
//!
//! ## Creation Reason
//! Main entry point for the SkyLink command channel binary. Handles CLI
//! parsing, logging setup and dispatch to the server or client tools.
//!
//! ## Main Functionality
//! - CLI argument parsing with clap
//! - Logging initialization with tracing
//! - Server start and config validation
//! - Key and password provisioning helpers
//! - A one-shot client for sending commands
//!
//! ## Usage
//! ```bash
//! # Provision an identity key and a password digest
//! skylink-server keygen --out /etc/skylink/user1.pem
//! skylink-server hash-password --password password1
//!
//! # Start the server
//! skylink-server start --config /etc/skylink/server.toml
//!
//! # Drive it
//! skylink-server send --username user1 --password password1 \
//!     --key-file /etc/skylink/user1.pem takeoff land
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - `start` falls back to defaults when the config file is missing
//! - RUST_LOG overrides the configured log level
//! - `keygen` is a provisioning tool; the server itself never writes keys
//!
//! ## Last Modified
//! v0.1.0 - Initial CLI implementation

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use skylink_core::crypto::{KeyPair, PasswordHash};
use skylink_server::{CommandClient, LoginOutcome, Reply, Server, ServerConfig};

const DEFAULT_CONFIG_PATH: &str = "/etc/skylink/server.toml";
const DEFAULT_LOG_LEVEL: &str = "info";

// ============================================
// CLI Definition
// ============================================

/// SkyLink authenticated drone command channel
#[derive(Parser, Debug)]
#[command(name = "skylink-server")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the server
    Start {
        /// Path to configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },

    /// Validate configuration file and print the effective settings
    Validate {
        /// Path to configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },

    /// Generate an RSA-2048 key pair as PKCS#8 PEM
    Keygen {
        /// Output file
        #[arg(short, long)]
        out: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print a salted password digest for `password_hash`
    HashPassword {
        /// Password to hash
        #[arg(short, long)]
        password: String,
    },

    /// Log in and send messages to a running server
    Send {
        /// Server address
        #[arg(short, long, default_value = "127.0.0.1:5000")]
        addr: SocketAddr,

        /// Username
        #[arg(short, long)]
        username: String,

        /// Password
        #[arg(short, long)]
        password: String,

        /// PKCS#8 PEM key the server has on file for this user
        /// (or any key in mutual mode)
        #[arg(short, long)]
        key_file: PathBuf,

        /// Send our public key after login (server in mutual mode)
        #[arg(long)]
        mutual: bool,

        /// Messages to send, in order
        #[arg(required = true)]
        messages: Vec<String>,
    },
}

// ============================================
// Main
// ============================================

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging; `start` waits for the configured level
    if !matches!(cli.command, Commands::Start { .. }) {
        init_logging(DEFAULT_LOG_LEVEL);
    }

    // Execute command
    let result = match cli.command {
        Commands::Start { config } => cmd_start(config).await,
        Commands::Validate { config } => cmd_validate(config).await,
        Commands::Keygen { out, force } => cmd_keygen(out, force).await,
        Commands::HashPassword { password } => cmd_hash_password(&password),
        Commands::Send {
            addr,
            username,
            password,
            key_file,
            mutual,
            messages,
        } => cmd_send(addr, username, password, key_file, mutual, messages).await,
    };

    // Handle errors
    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

// ============================================
// Commands
// ============================================

/// Starts the server.
async fn cmd_start(config_path: PathBuf) -> anyhow::Result<()> {
    // Load configuration
    let (config, found) = if config_path.exists() {
        match ServerConfig::load(&config_path).await {
            Ok(config) => (config, true),
            Err(e) => {
                init_logging(DEFAULT_LOG_LEVEL);
                return Err(e.into());
            }
        }
    } else {
        (ServerConfig::default(), false)
    };

    init_logging(&config.logging.level);
    if !found {
        warn!("Config file {} not found, using defaults", config_path.display());
    }
    info!("Starting SkyLink server...");

    let server = Server::from_config(config).await?;
    server.run().await?;

    Ok(())
}

/// Validates configuration file.
async fn cmd_validate(config_path: PathBuf) -> anyhow::Result<()> {
    if !config_path.exists() {
        println!("⚠️  Config file not found: {}", config_path.display());
        println!("   Server will use default values.");
        return Ok(());
    }

    let config = ServerConfig::load(&config_path).await?;

    println!("✅ Configuration is valid");
    println!();
    println!("Network:");
    println!("   Listen:           {}", config.listen_addr());
    println!();
    println!("Security:");
    println!("   Key Exchange:     {}", config.security.key_exchange);
    match &config.security.server_key_file {
        Some(path) => println!("   Server Key:       {}", path.display()),
        None => println!("   Server Key:       generated at startup"),
    }
    println!();
    println!("Auth:");
    println!("   Max Attempts:     {}", config.auth.max_attempts);
    println!("   Failure Delay:    {}ms", config.auth.failure_delay_ms);
    println!();
    println!("Limits:");
    println!("   Max Connections:  {}", config.limits.max_connections);
    println!("   Idle Timeout:     {}s", config.limits.idle_timeout_secs);
    println!();
    println!("Users:");
    for user in &config.users {
        let storage = if user.password_hash.is_some() { "hashed" } else { "plaintext" };
        println!("   {:<16} role={} password={}", user.username, user.role, storage);
    }
    println!();

    Ok(())
}

/// Writes a new PKCS#8 key file.
async fn cmd_keygen(out: PathBuf, force: bool) -> anyhow::Result<()> {
    if out.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", out.display());
    }

    info!("Generating RSA-2048 key pair...");
    let keys = tokio::task::spawn_blocking(KeyPair::generate).await??;
    save_key(&keys, &out).await?;

    println!("✅ Key written to {}", out.display());
    println!("   Public key: {}", keys.public_key());
    Ok(())
}

/// Prints a password digest.
fn cmd_hash_password(password: &str) -> anyhow::Result<()> {
    println!("{}", PasswordHash::generate(password));
    Ok(())
}

/// Logs in and sends each message.
async fn cmd_send(
    addr: SocketAddr,
    username: String,
    password: String,
    key_file: PathBuf,
    mutual: bool,
    messages: Vec<String>,
) -> anyhow::Result<()> {
    let keys = KeyPair::load(&key_file)
        .with_context(|| format!("loading key file {}", key_file.display()))?;

    let mut client = CommandClient::connect(addr, keys).await?;
    match client.login(&username, &password).await? {
        LoginOutcome::Authenticated => println!("✅ Authenticated as {username}"),
        LoginOutcome::Rejected(reply) => bail!("login rejected: {reply}"),
    }

    if mutual {
        client.share_public_key().await?;
    }

    for message in &messages {
        match client.send(message).await? {
            Reply::Ack(ack) => println!("→ {message}: {ack}"),
            Reply::DecryptionFailed => println!("→ {message}: server could not decrypt"),
        }
    }

    Ok(())
}

// ============================================
// Helper Functions
// ============================================

/// Initializes the tracing subscriber.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .try_init()
        .ok();
}

/// Saves a private key as PKCS#8 PEM.
async fn save_key(keys: &KeyPair, path: &Path) -> anyhow::Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let pem = keys.to_pkcs8_pem()?;
    tokio::fs::write(path, pem.as_bytes()).await?;

    // Set restrictive permissions on Unix
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = tokio::fs::metadata(path).await?.permissions();
        perms.set_mode(0o600);
        tokio::fs::set_permissions(path, perms).await?;
    }

    Ok(())
}
