use crate::core::db::ConnectionParams;
use crate::core::{DbError, Result};
use crate::handler::HandlerOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration structure parsed from a TOML file.
#[derive(Debug, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub handler: Option<HandlerConfig>,
    pub logging: Option<LoggingConfig>,
}

/// Connection settings. Every key is required.
#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    pub name: String,
}

/// Handler behavior.
#[derive(Debug, Deserialize)]
pub struct HandlerConfig {
    pub sanitize_on_write: Option<bool>,
    pub create_if_missing: Option<bool>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

impl Config {
    pub fn connection_params(&self) -> ConnectionParams {
        ConnectionParams::new(
            self.database.host.as_str(),
            self.database.username.as_str(),
            self.database.password.as_str(),
            self.database.name.as_str(),
        )
    }

    pub fn handler_options(&self) -> HandlerOptions {
        let defaults = HandlerOptions::default();
        let handler = self.handler.as_ref();
        HandlerOptions {
            sanitize_on_write: handler
                .and_then(|h| h.sanitize_on_write)
                .unwrap_or(defaults.sanitize_on_write),
            create_if_missing: handler
                .and_then(|h| h.create_if_missing)
                .unwrap_or(defaults.create_if_missing),
        }
    }

    /// The configured log level, if any.
    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref()?.level.as_deref()
    }
}

/// Parses configuration from TOML text.
pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).map_err(|e| DbError::Config(e.to_string()))
}

/// Loads configuration from a TOML file at the given path.
///
/// # Example
///
/// ```no_run
/// let config = dbhandler::config::load_config("config.toml").expect("Failed to load config");
/// println!("{:?}", config.connection_params());
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// `<config dir>/dbhandler/config.toml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dbhandler").join("config.toml"))
}
