//! Listener, TLS and settings-store configuration.

use std::path::PathBuf;

use chrono::Duration;
use serde::Deserialize;

use crate::adapter::inbound::cli::paths;
use crate::adapter::inbound::server::{
    ResponseFormat, DEFAULT_MAX_LOGIN_ATTEMPTS, DEFAULT_MAX_SESSION_SECS, DEFAULT_PORT,
};

/// Longest accepted session, one year.
pub const MAX_SESSION_SECS_LIMIT: u64 = 365 * 24 * 60 * 60;

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

const fn default_max_session_secs() -> u64 {
    DEFAULT_MAX_SESSION_SECS
}

const fn default_max_login_attempts() -> u32 {
    DEFAULT_MAX_LOGIN_ATTEMPTS
}

fn default_subject_names() -> Vec<String> {
    vec!["localhost".to_string()]
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Interface to listen on.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// TCP port (default: 8082).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum session length in seconds (default: 1800).
    #[serde(default = "default_max_session_secs")]
    pub max_session_secs: u64,
    /// Failed logins tolerated per connection before it is closed (default: 3).
    #[serde(default = "default_max_login_attempts")]
    pub max_login_attempts: u32,
    /// `json` (default) or `text`.
    #[serde(default)]
    pub response_format: ResponseFormat,
}

impl ServerConfig {
    /// `host:port` string suitable for binding; IPv6 hosts are bracketed.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        if self.bind.contains(':') && !self.bind.starts_with('[') {
            format!("[{}]:{}", self.bind, self.port)
        } else {
            format!("{}:{}", self.bind, self.port)
        }
    }

    #[must_use]
    pub fn max_session_length(&self) -> Duration {
        let secs = self.max_session_secs.min(MAX_SESSION_SECS_LIMIT);
        Duration::seconds(i64::try_from(secs).unwrap_or_default())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            max_session_secs: default_max_session_secs(),
            max_login_attempts: default_max_login_attempts(),
            response_format: ResponseFormat::default(),
        }
    }
}

/// `[tls]` section.
///
/// Either both PEM paths are set, or `self_signed` is true.
#[derive(Debug, Clone, Deserialize)]
pub struct TlsConfig {
    /// PEM certificate chain.
    #[serde(default)]
    pub cert_path: Option<PathBuf>,
    /// PEM private key.
    #[serde(default)]
    pub key_path: Option<PathBuf>,
    /// Generate a throwaway certificate at startup.
    #[serde(default)]
    pub self_signed: bool,
    /// Subject alternative names for the self-signed certificate.
    #[serde(default = "default_subject_names")]
    pub subject_names: Vec<String>,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            cert_path: None,
            key_path: None,
            self_signed: false,
            subject_names: default_subject_names(),
        }
    }
}

/// `[settings]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsConfig {
    /// Flat TOML file holding `Login` and `Password`.
    #[serde(default = "paths::default_settings")]
    pub path: PathBuf,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            path: paths::default_settings(),
        }
    }
}

/// One `[[bots]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    pub name: String,
    #[serde(default)]
    pub log_path: Option<PathBuf>,
    #[serde(default)]
    pub stopped: bool,
}
