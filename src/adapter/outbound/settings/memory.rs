//! In-memory settings store.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::Result;
use crate::port::Settings;

/// Settings held only in process memory.
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySettings {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `values`.
    #[must_use]
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = values
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            values: RwLock::new(values),
        }
    }
}

impl Settings for MemorySettings {
    fn get(&self, name: &str) -> Option<String> {
        self.values.read().get(name).cloned()
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .insert(name.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get() {
        let settings = MemorySettings::new();
        assert_eq!(settings.get("Login"), None);
        settings.set("Login", "admin").unwrap();
        assert_eq!(settings.get("Login").as_deref(), Some("admin"));
    }

    #[test]
    fn set_overwrites() {
        let settings = MemorySettings::with_values([("Login", "admin")]);
        settings.set("Login", "root").unwrap();
        assert_eq!(settings.get("Login").as_deref(), Some("root"));
    }
}
