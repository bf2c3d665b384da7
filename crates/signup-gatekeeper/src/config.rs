//! Configuration for the signup gatekeeper.

use anyhow::{bail, Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Gatekeeper configuration.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Identity service configuration
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Account database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize)]
pub struct IdentityConfig {
    /// Identity service base URL
    #[serde(default = "default_identity_api_url")]
    pub api_url: String,

    /// Bearer credential for the identity service. Must be supplied via
    /// environment (IDENTITY__API_KEY); there is no usable default.
    #[serde(default = "default_api_key")]
    pub api_key: SecretString,

    /// Timeout for a single event lookup
    #[serde(with = "humantime_serde", default = "default_identity_timeout")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    /// Resolve the configured listen address and port. A malformed
    /// address is an error, not a silent fallback.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .listen_addr
            .parse()
            .with_context(|| format!("Invalid listen address: {}", self.listen_addr))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default implementations
impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            api_url: default_identity_api_url(),
            api_key: default_api_key(),
            timeout: default_identity_timeout(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_identity_api_url() -> String {
    "https://api.fpjs.io".into()
}

fn default_api_key() -> SecretString {
    SecretString::new(String::new())
}

fn default_identity_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_database_path() -> PathBuf {
    PathBuf::from("/data/accounts.db")
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        let config: Config = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        if config.identity.api_key.expose_secret().is_empty() {
            bail!("IDENTITY__API_KEY must be set");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let identity = IdentityConfig::default();
        assert_eq!(identity.timeout, Duration::from_secs(10));
        assert!(identity.api_key.expose_secret().is_empty());

        let server = ServerConfig::default();
        assert_eq!(server.port, 8080);
        assert_eq!(server.listen_addr, "0.0.0.0");
    }

    #[test]
    fn test_socket_addr_resolution() {
        let server = ServerConfig::default();
        let addr = server.socket_addr().unwrap();
        assert_eq!(addr, "0.0.0.0:8080".parse().unwrap());
    }

    #[test]
    fn test_socket_addr_rejects_malformed_address() {
        let server = ServerConfig {
            listen_addr: "not-an-ip".into(),
            port: 8080,
        };
        assert!(server.socket_addr().is_err());
    }
}
