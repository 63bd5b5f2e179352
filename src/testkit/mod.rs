//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`bots`] - In-memory [`Bot`](crate::port::Bot) and
//!   [`BotRegistry`](crate::port::BotRegistry) fakes.
//! - [`server`] - Self-signed TLS configs, ready-to-start servers, and a
//!   line-oriented TLS test client.

pub mod bots;
pub mod server;
