//! File-backed settings store.
//!
//! The file is a flat TOML table of string values:
//!
//! ```toml
//! Login = "admin"
//! Password = "$argon2id$v=19$m=19456,t=2,p=1$..."
//! ```
//!
//! Values are cached in memory on open. Every `set` rewrites the whole file
//! through a temporary sibling and a rename, so readers never observe a
//! half-written file.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::{Result, SettingsError};
use crate::port::Settings;

/// Settings persisted to a TOML file.
#[derive(Debug)]
pub struct TomlSettingsStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl TomlSettingsStore {
    /// Open the store at `path`.
    ///
    /// A missing file is treated as empty and created on the first `set`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(content) => parse(&path, &content)?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "Settings file not found, starting empty");
                BTreeMap::new()
            }
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.display().to_string(),
                    source,
                }
                .into())
            }
        };

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let content = toml::to_string(values).map_err(SettingsError::from)?;
        let write_error = |source| SettingsError::Write {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_error)?;
        }

        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        let temp = PathBuf::from(temp);
        write_private(&temp, &content).map_err(write_error)?;
        fs::rename(&temp, &self.path).map_err(write_error)?;
        Ok(())
    }
}

/// Write `content` to a fresh file readable by the owner only.
fn write_private(path: &Path, content: &str) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Err(err) if err.kind() != ErrorKind::NotFound => return Err(err),
        _ => {}
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()
}

fn parse(path: &Path, content: &str) -> Result<BTreeMap<String, String>> {
    let format_error = |reason: String| SettingsError::Format {
        path: path.display().to_string(),
        reason,
    };

    let table: toml::Table = toml::from_str(content).map_err(|e| format_error(e.to_string()))?;
    table
        .into_iter()
        .map(|(name, value)| match value {
            toml::Value::String(value) => Ok((name, value)),
            other => Err(format_error(format!(
                "`{name}` is a {}, expected a string",
                other.type_str()
            ))
            .into()),
        })
        .collect()
}

impl Settings for TomlSettingsStore {
    fn get(&self, name: &str) -> Option<String> {
        self.values.read().get(name).cloned()
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(SettingsError::InvalidName(name.to_string()).into());
        }

        let mut values = self.values.write();
        let mut updated = values.clone();
        updated.insert(name.to_string(), value.to_string());
        self.persist(&updated)?;
        *values = updated;

        info!(setting = name, path = %self.path.display(), "Setting updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlSettingsStore::open(dir.path().join("settings.toml")).unwrap();
        assert_eq!(store.get("Login"), None);
    }

    #[test]
    fn set_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");

        let store = TomlSettingsStore::open(&path).unwrap();
        store.set("Login", "admin").unwrap();
        store.set("Password", "$argon2id$v=19$hash").unwrap();

        let reopened = TomlSettingsStore::open(&path).unwrap();
        assert_eq!(reopened.get("Login").as_deref(), Some("admin"));
        assert_eq!(reopened.get("Password").as_deref(), Some("$argon2id$v=19$hash"));
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn reads_existing_flat_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "Login = \"admin\"\nTheme = \"dark\"\n").unwrap();

        let store = TomlSettingsStore::open(&path).unwrap();
        assert_eq!(store.get("Login").as_deref(), Some("admin"));
        assert_eq!(store.get("Theme").as_deref(), Some("dark"));
    }

    #[test]
    fn rejects_non_string_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "Login = 42\n").unwrap();

        match TomlSettingsStore::open(&path) {
            Err(Error::Settings(SettingsError::Format { reason, .. })) => {
                assert!(reason.contains("Login"));
            }
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_blank_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlSettingsStore::open(dir.path().join("settings.toml")).unwrap();
        assert!(matches!(
            store.set(" ", "x"),
            Err(Error::Settings(SettingsError::InvalidName(_)))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn settings_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let mut stale = path.clone().into_os_string();
        stale.push(".tmp");
        fs::write(&stale, "left over").unwrap();
        fs::set_permissions(&stale, fs::Permissions::from_mode(0o644)).unwrap();

        let store = TomlSettingsStore::open(&path).unwrap();
        store.set("Password", "$argon2id$v=19$hash").unwrap();

        assert_eq!(store.path(), path.as_path());
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
