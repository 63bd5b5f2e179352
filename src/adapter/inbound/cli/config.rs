//! Handler for the `config` command group.

use std::path::Path;

use crate::adapter::inbound::cli::output;
use crate::infrastructure::config::settings::Config;
use crate::error::Result;

/// Execute `config validate`.
pub fn execute_validate(path: &Path) -> Result<()> {
    let config = Config::load(path)?;

    output::section("Configuration Valid");
    output::field("Path", path.display());
    output::field("Listen", config.server.bind_addr());
    output::field("Session", format!("{}s", config.server.max_session_secs));
    output::field("Attempts", config.server.max_login_attempts);
    output::field(
        "Certificate",
        if config.tls.self_signed {
            "self-signed".to_string()
        } else {
            config
                .tls
                .cert_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        },
    );
    output::field("Settings", config.settings.path.display());
    output::field("Bots", config.bots.len());
    if config.bots.is_empty() {
        output::warning("No bots configured; listbots will return an empty list");
    }
    Ok(())
}
