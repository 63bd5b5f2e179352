//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; `EDGECTL_PORT` and
//! `EDGECTL_SETTINGS_PATH` override the file when set.
//!
//! # Example
//!
//! ```no_run
//! use edgectl::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```
//!
//! A minimal file:
//!
//! ```toml
//! [server]
//! port = 8082
//! max_session_secs = 1800
//!
//! [tls]
//! cert_path = "/etc/edgectl/cert.pem"
//! key_path = "/etc/edgectl/key.pem"
//!
//! [[bots]]
//! name = "polymarket-arb"
//! log_path = "/var/log/edgelord/arb.log"
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::logging::LoggingConfig;
use super::server::{BotConfig, ServerConfig, SettingsConfig, TlsConfig, MAX_SESSION_SECS_LIMIT};
use crate::error::{ConfigError, Result};

/// Overrides `[server] port`.
pub const PORT_ENV_VAR: &str = "EDGECTL_PORT";

/// Overrides `[settings] path`.
pub const SETTINGS_PATH_ENV_VAR: &str = "EDGECTL_SETTINGS_PATH";

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`]. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Listener and session limits.
    #[serde(default)]
    pub server: ServerConfig,

    /// Certificate source.
    #[serde(default)]
    pub tls: TlsConfig,

    /// Where the operator credential is stored.
    #[serde(default)]
    pub settings: SettingsConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Bots exposed to the operator.
    #[serde(default)]
    pub bots: Vec<BotConfig>,
}

impl Config {
    /// Parse configuration from TOML content, apply environment overrides and
    /// validate.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The TOML content is malformed
    /// - An override variable holds an invalid value
    /// - Validation fails
    pub fn parse_toml(content: &str) -> Result<Self> {
        Self::parse_toml_with_env(content, |name| std::env::var(name).ok())
    }

    /// Like [`Config::parse_toml`] with an explicit environment lookup.
    pub fn parse_toml_with_env<F>(content: &str, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env_overrides(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    fn apply_env_overrides<F>(&mut self, env: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = env(PORT_ENV_VAR).filter(|v| !v.trim().is_empty()) {
            self.server.port = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: PORT_ENV_VAR,
                reason: format!("`{raw}` is not a port number"),
            })?;
        }
        if let Some(path) = env(SETTINGS_PATH_ENV_VAR).filter(|v| !v.trim().is_empty()) {
            self.settings.path = PathBuf::from(path);
        }
        Ok(())
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are present and values are within
    /// acceptable ranges.
    fn validate(&self) -> Result<()> {
        if self.server.bind.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "bind" }.into());
        }
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "port",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.server.max_session_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_session_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.server.max_session_secs > MAX_SESSION_SECS_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: "max_session_secs",
                reason: format!("must be at most {MAX_SESSION_SECS_LIMIT}"),
            }
            .into());
        }
        if self.server.max_login_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_login_attempts",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.tls.self_signed {
            if self.tls.subject_names.iter().all(|name| name.trim().is_empty()) {
                return Err(ConfigError::MissingField {
                    field: "subject_names",
                }
                .into());
            }
        } else {
            if self.tls.cert_path.is_none() {
                return Err(ConfigError::MissingField { field: "cert_path" }.into());
            }
            if self.tls.key_path.is_none() {
                return Err(ConfigError::MissingField { field: "key_path" }.into());
            }
        }

        if self.settings.path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField {
                field: "settings.path",
            }
            .into());
        }

        let mut seen = HashSet::new();
        for bot in &self.bots {
            if bot.name.trim().is_empty() {
                return Err(ConfigError::MissingField { field: "bots.name" }.into());
            }
            if !seen.insert(bot.name.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "bots.name",
                    reason: format!("duplicate bot `{}`", bot.name),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
