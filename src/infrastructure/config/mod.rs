//! Infrastructure configuration modules.

pub mod logging;
pub mod server;
pub mod settings;
