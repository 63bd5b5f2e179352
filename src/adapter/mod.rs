//! Implementations of ports (hexagonal adapters).
//!
//! - [`inbound`] - Driving adapters: the TLS server and the CLI
//! - [`outbound`] - Driven adapters: settings stores and bot sources

pub mod inbound;
pub mod outbound;
