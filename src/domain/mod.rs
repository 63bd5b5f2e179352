//! Transport-agnostic remote-control types.
//!
//! Nothing here performs I/O; the serving loop and commands build on these.

pub mod auth;
pub mod params;
pub mod response;
pub mod session;

pub use auth::{AuthState, Credential};
pub use params::ParameterMap;
pub use response::Response;
pub use session::Session;
