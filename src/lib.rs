//! edgectl - TLS remote control for edgelord bots.
//!
//! An operator connects over TLS, logs in with a login and password, and then
//! issues line-oriented commands (`listbots`, `botlog name=arb lines=20`, ...)
//! that are answered with one JSON response each. One client is served at a
//! time and every session expires after a configurable length.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - [`domain`] - Session state, credentials, parameter maps, responses
//! - [`port`] - Traits for the settings store and the bots under control
//! - [`application`] - Authentication, session expiry, line parsing, command dispatch
//! - [`adapter`] - The TLS server and CLI (inbound), settings files and bot sources (outbound)
//! - [`infrastructure`] - Configuration, TLS identities, and runtime wiring
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use edgectl::infrastructure::bootstrap;
//! use edgectl::infrastructure::config::settings::Config;
//!
//! # async fn example() -> edgectl::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! let mut server = bootstrap::build_server(&config)?;
//! let addr = server.start().await?;
//! println!("remote control on {addr}");
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
