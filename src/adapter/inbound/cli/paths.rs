//! Path utilities for edgectl.
//!
//! All data lives under `~/.edgectl/`:
//! - `~/.edgectl/config.toml` - server configuration
//! - `~/.edgectl/settings.toml` - operator login and password hash

use std::path::PathBuf;

/// Returns the edgectl home directory (`~/.edgectl/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".edgectl")
}

/// Returns the default config file path (`~/.edgectl/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

/// Returns the default settings store path (`~/.edgectl/settings.toml`).
pub fn default_settings() -> PathBuf {
    home_dir().join("settings.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_under_edgectl_home() {
        let home = home_dir();
        assert!(home.ends_with(".edgectl"));
        assert!(default_config().starts_with(&home));
        assert!(default_settings().starts_with(&home));
        assert_ne!(default_config(), default_settings());
    }
}
