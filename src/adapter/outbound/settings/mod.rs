//! Settings store adapters.

mod memory;
mod toml_file;

pub use memory::MemorySettings;
pub use toml_file::TomlSettingsStore;
