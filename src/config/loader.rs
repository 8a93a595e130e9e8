//! Configuration Loader
//!
//! Environment-aware configuration loading. Sources are layered with the
//! `config` crate, lowest precedence first:
//!
//! 1. Built-in defaults (`AppConfig::default()`)
//! 2. `<config_dir>/book_review.toml`
//! 3. `<config_dir>/book_review.<environment>.toml`
//! 4. `BOOK_REVIEW__SECTION__KEY` environment variables
//!
//! `DATABASE_URL` fills `database.url` when no other source set it.

use ::config::{Config, Environment, File, Map};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use super::error::ConfigResult;
use super::AppConfig;
use crate::constants::defaults;

const CONFIG_FILE_STEM: &str = "book_review";
const ENV_PREFIX: &str = "BOOK_REVIEW";

pub struct ConfigManager {
    config: AppConfig,
    environment: String,
    config_directory: PathBuf,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        Self::load_from_directory(None)
    }

    /// Load configuration from a specific directory
    pub fn load_from_directory(config_dir: Option<PathBuf>) -> ConfigResult<Arc<ConfigManager>> {
        let environment = Self::detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration from a specific directory with explicit environment.
    /// Lets tests pick an environment without touching process-wide variables.
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        Self::load_layers(config_dir, environment, None)
    }

    /// Same as [`load_from_directory_with_env`](Self::load_from_directory_with_env),
    /// but environment variables (including `DATABASE_URL`) are read from
    /// `env_vars` instead of the process environment.
    pub fn load_from_directory_with_env_vars(
        config_dir: Option<PathBuf>,
        environment: &str,
        env_vars: Map<String, String>,
    ) -> ConfigResult<Arc<ConfigManager>> {
        Self::load_layers(config_dir, environment, Some(env_vars))
    }

    fn load_layers(
        config_dir: Option<PathBuf>,
        environment: &str,
        env_vars: Option<Map<String, String>>,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let database_url = match &env_vars {
            Some(vars) => vars.get("DATABASE_URL").cloned(),
            None => env::var("DATABASE_URL").ok(),
        };
        let config_directory = config_dir.unwrap_or_else(|| PathBuf::from("config"));

        debug!(
            "Loading configuration for environment '{}' from directory: {}",
            environment,
            config_directory.display()
        );

        let mut config: AppConfig = Config::builder()
            .add_source(
                File::from(config_directory.join(format!("{CONFIG_FILE_STEM}.toml")))
                    .required(false),
            )
            .add_source(
                File::from(config_directory.join(format!("{CONFIG_FILE_STEM}.{environment}.toml")))
                    .required(false),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .source(env_vars),
            )
            .build()?
            .try_deserialize()?;

        if config.database.url.is_none() {
            config.database.url = database_url;
        }

        config.validate()?;

        info!(
            environment = environment,
            bind_address = %config.server.bind_address,
            backend = ?config.database.backend,
            database_url = %Self::sanitize_url(config.database.url.as_deref()),
            notifications_enabled = config.notifications.enabled,
            "Configuration loaded successfully"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory,
        }))
    }

    /// Build a manager around an already-assembled configuration
    pub fn from_config(config: AppConfig, environment: &str) -> ConfigResult<Arc<ConfigManager>> {
        config.validate()?;
        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory: PathBuf::from("config"),
        }))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn config_directory(&self) -> &Path {
        &self.config_directory
    }

    /// Detect current environment: BOOK_REVIEW_ENV || APP_ENV || 'development'
    pub fn detect_environment() -> String {
        env::var("BOOK_REVIEW_ENV")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| defaults::ENVIRONMENT.to_string())
            .to_lowercase()
    }

    /// Mask the password portion of a connection URL for logging
    pub fn sanitize_url(url: Option<&str>) -> String {
        let Some(url) = url else {
            return "[NONE]".to_string();
        };

        match (url.find("://"), url.rfind('@')) {
            (Some(scheme_end), Some(at)) if at > scheme_end => {
                let credentials = &url[scheme_end + 3..at];
                let user = credentials.split(':').next().unwrap_or_default();
                format!("{}{user}:***{}", &url[..scheme_end + 3], &url[at..])
            }
            _ => url.to_string(),
        }
    }
}
