//! Bot registry adapters.

mod file_log;
mod registry;

pub use file_log::LogFileBot;
pub use registry::StaticBotRegistry;
