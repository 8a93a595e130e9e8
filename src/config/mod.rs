//! # Service Configuration
//!
//! Layered configuration for the catalog service. Values come from built-in
//! defaults, optional TOML files and `BOOK_REVIEW__`-prefixed environment
//! variables, in that order of precedence (later wins).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use book_review_core::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let bind_address = &manager.config().server.bind_address;
//! let backend = manager.config().database.backend;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::constants::defaults;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure mirroring `config/book_review.toml`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings
    pub server: ServerConfig,

    /// Entity store selection and connection settings
    pub database: DatabaseConfig,

    /// Review confirmation settings
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: defaults::BIND_ADDRESS.to_string(),
        }
    }
}

/// Which entity store implementation backs the catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: StorageBackend,
    pub url: Option<String>,
    pub max_connections: u32,
    pub connect_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            url: None,
            max_connections: defaults::MAX_CONNECTIONS,
            connect_timeout_seconds: defaults::CONNECT_TIMEOUT_SECONDS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// When false, submitted reviews schedule no confirmation
    pub enabled: bool,
    /// Address the simulated confirmation email is sent from
    pub sender_address: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sender_address: defaults::SENDER_ADDRESS.to_string(),
        }
    }
}

impl AppConfig {
    /// Validate cross-field constraints after loading
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.bind_address.parse::<SocketAddr>().is_err() {
            return Err(ConfigurationError::invalid_value(
                "server.bind_address",
                self.server.bind_address.clone(),
                "must be a socket address such as 127.0.0.1:8080",
            ));
        }

        if self.database.backend == StorageBackend::Postgres
            && self.database.url.as_deref().map_or(true, str::is_empty)
        {
            return Err(ConfigurationError::missing_required_field(
                "database.url",
                "postgres backend",
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigurationError::invalid_value(
                "database.max_connections",
                "0",
                "pool size must be greater than 0",
            ));
        }

        if self.notifications.enabled && self.notifications.sender_address.trim().is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "notifications.sender_address",
                "notification configuration",
            ));
        }

        Ok(())
    }

    pub fn bind_address(&self) -> ConfigResult<SocketAddr> {
        self.server.bind_address.parse().map_err(|_| {
            ConfigurationError::invalid_value(
                "server.bind_address",
                self.server.bind_address.clone(),
                "must be a socket address",
            )
        })
    }
}
