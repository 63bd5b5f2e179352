//! Remote-control use cases: login, session lifetime, parsing and dispatch.
//!
//! Depends on `domain` and `port`; knows nothing about sockets or TLS.

pub mod auth;
pub mod command;
pub mod protocol;
pub mod registry;
pub mod session;

pub use auth::{hash_password, AuthOutcome, Authenticator};
pub use command::{standard_registry, Command, CommandContext};
pub use protocol::{parse_line, CommandLine};
pub use registry::{CommandRegistry, CommandRegistryBuilder};
pub use session::{SessionManager, SessionSnapshot};
