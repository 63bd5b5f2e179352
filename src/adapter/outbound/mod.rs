//! Outbound adapters (driven side).

pub mod bot;
pub mod settings;
