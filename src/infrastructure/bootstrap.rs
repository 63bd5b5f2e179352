//! Infrastructure bootstrap helpers for runtime wiring.
//!
//! The composition root: every long-lived object is built here once and
//! handed on as an `Arc`.

use std::sync::Arc;

use tracing::{info, warn};

use crate::adapter::inbound::server::{RemoteServer, ServerOptions};
use crate::adapter::outbound::bot::{LogFileBot, StaticBotRegistry};
use crate::adapter::outbound::settings::TomlSettingsStore;
use crate::application::command::standard_registry;
use crate::domain::Credential;
use crate::error::Result;
use crate::infrastructure::config::server::{BotConfig, ServerConfig};
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::tls::TlsIdentity;
use crate::port::{Bot, BotRegistry, Settings, LOGIN_SETTING, PASSWORD_SETTING};

/// Read the operator credential from the settings store.
///
/// Missing values yield an unusable credential, which rejects every login.
#[must_use]
pub fn load_credential(settings: &dyn Settings) -> Credential {
    let login = settings.get(LOGIN_SETTING).unwrap_or_default();
    let password_hash = settings.get(PASSWORD_SETTING).unwrap_or_default();
    let credential = Credential::new(login, password_hash);
    if !credential.is_usable() {
        warn!(
            "No operator credential configured; run `edgectl set-credentials` to enable logins"
        );
    }
    credential
}

/// Build the bot registry from `[[bots]]` entries.
#[must_use]
pub fn build_bot_registry(bots: &[BotConfig]) -> StaticBotRegistry {
    StaticBotRegistry::new(bots.iter().map(|bot| {
        Arc::new(LogFileBot::new(&bot.name, bot.log_path.clone(), bot.stopped)) as Arc<dyn Bot>
    }))
}

/// Translate the `[server]` section into runtime options.
#[must_use]
pub fn server_options(config: &ServerConfig, tls: Arc<rustls::ServerConfig>) -> ServerOptions {
    ServerOptions::new(config.bind_addr(), tls)
        .with_max_session_length(config.max_session_length())
        .with_max_login_attempts(config.max_login_attempts)
        .with_response_format(config.response_format)
}

/// Wire a ready-to-start server from configuration.
pub fn build_server(config: &Config) -> Result<RemoteServer> {
    let settings = TomlSettingsStore::open(&config.settings.path)?;
    let credential = Arc::new(load_credential(&settings));

    let bots: Arc<dyn BotRegistry> = Arc::new(build_bot_registry(&config.bots));
    let registry = Arc::new(standard_registry(bots));

    let tls = TlsIdentity::from_config(&config.tls)?.into_server_config()?;

    info!(
        bots = config.bots.len(),
        settings = %config.settings.path.display(),
        "Remote control wired"
    );
    Ok(RemoteServer::new(
        server_options(&config.server, tls),
        credential,
        registry,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::settings::MemorySettings;
    use crate::application::hash_password;

    #[test]
    fn credential_comes_from_login_and_password_settings() {
        let hash = hash_password("secret").unwrap();
        let settings = MemorySettings::with_values([("Login", "admin"), ("Password", hash.as_str())]);
        let credential = load_credential(&settings);
        assert_eq!(credential.login(), "admin");
        assert_eq!(credential.password_hash(), hash);
        assert!(credential.is_usable());
    }

    #[test]
    fn missing_settings_give_unusable_credential() {
        let credential = load_credential(&MemorySettings::new());
        assert!(!credential.is_usable());
    }

    #[test]
    fn bot_registry_mirrors_config() {
        let bots = vec![
            BotConfig {
                name: "alpha".into(),
                log_path: None,
                stopped: false,
            },
            BotConfig {
                name: "beta".into(),
                log_path: None,
                stopped: true,
            },
        ];
        let registry = build_bot_registry(&bots);
        assert_eq!(registry.names(), vec!["alpha", "beta"]);
        assert!(registry.bot("beta").unwrap().is_stopped());
    }

    #[test]
    fn build_server_with_self_signed_identity() {
        let dir = tempfile::tempdir().unwrap();
        let toml = format!(
            "[tls]\nself_signed = true\n[settings]\npath = \"{}\"\n",
            dir.path().join("settings.toml").display()
        );
        let config = Config::parse_toml_with_env(&toml, |_| None).unwrap();
        let server = build_server(&config).unwrap();
        assert!(server.local_addr().is_none());
    }
}
