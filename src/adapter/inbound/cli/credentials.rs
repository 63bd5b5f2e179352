//! Handlers for `hash-password` and `set-credentials`.

use std::io::BufRead;
use std::path::PathBuf;

use dialoguer::{theme::ColorfulTheme, Password};

use crate::adapter::inbound::cli::command::{PasswordSourceArgs, SetCredentialsArgs};
use crate::adapter::inbound::cli::{output, paths};
use crate::adapter::outbound::settings::TomlSettingsStore;
use crate::application::hash_password;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::settings::{Config, SETTINGS_PATH_ENV_VAR};
use crate::port::{Settings, LOGIN_SETTING, PASSWORD_SETTING};

/// Execute `hash-password`: print the PHC string on stdout.
pub fn execute_hash_password(args: &PasswordSourceArgs) -> Result<()> {
    let password = read_password(args)?;
    println!("{}", hash_password(&password)?);
    Ok(())
}

/// Execute `set-credentials`.
pub fn execute_set_credentials(args: &SetCredentialsArgs) -> Result<()> {
    let login = args.login.trim();
    if login.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "login",
            reason: "must not be empty".to_string(),
        }
        .into());
    }

    let path = settings_path(args)?;
    let password = read_password(&args.password)?;
    let hash = hash_password(&password)?;

    let store = TomlSettingsStore::open(&path)?;
    store.set(LOGIN_SETTING, login)?;
    store.set(PASSWORD_SETTING, &hash)?;

    output::success("Credentials stored");
    output::field("Login", login);
    output::field("Settings", store.path().display());
    Ok(())
}

/// `--settings`, else the config file's `[settings] path`, else the default.
fn settings_path(args: &SetCredentialsArgs) -> Result<PathBuf> {
    if let Some(path) = &args.settings {
        return Ok(path.clone());
    }
    if args.config.exists() {
        return Ok(Config::load(&args.config)?.settings.path);
    }
    Ok(std::env::var(SETTINGS_PATH_ENV_VAR)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map_or_else(paths::default_settings, PathBuf::from))
}

fn read_password(args: &PasswordSourceArgs) -> Result<String> {
    let password = if args.password_stdin {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        line.trim_end_matches(['\r', '\n']).to_string()
    } else {
        Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()?
    };

    if password.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "password",
            reason: "must not be empty".to_string(),
        }
        .into());
    }
    Ok(password)
}
