//! Configuration management for Biblioteca server

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

/// Where the session keys live
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    File,
}

/// What happens to the in-memory session when persisting it fails
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PersistFailurePolicy {
    /// Keep the new in-memory state; storage catches up on the next write
    #[default]
    Keep,
    /// Restore the previous in-memory state
    Rollback,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub backend: StorageBackend,
    /// Storage file for the `file` backend
    pub path: String,
    #[serde(default)]
    pub on_persist_failure: PersistFailurePolicy,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Artificial delay before checking credentials
    pub login_delay_ms: u64,
    /// Artificial delay before creating an account
    pub register_delay_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoansConfig {
    /// Days added to the due date by a renewal
    pub period_days: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub loans: LoansConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default"))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (with prefix BIBLIOTECA_)
            .add_source(
                Environment::with_prefix("BIBLIOTECA")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            // Override the storage file from SESSION_PATH if present
            .set_override_option("session.path", env::var("SESSION_PATH").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            session: SessionConfig::default(),
            auth: AuthConfig::default(),
            loans: LoansConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            path: "data/session.json".to_string(),
            on_persist_failure: PersistFailurePolicy::Keep,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            login_delay_ms: 1000,
            register_delay_ms: 1500,
        }
    }
}

impl Default for LoansConfig {
    fn default() -> Self {
        Self { period_days: 30 }
    }
}
