//! Persistent settings port.
//!
//! The remote-control server reads its operator credential through this
//! interface; the `set-credentials` CLI writes it.

use crate::error::Result;

/// Setting holding the operator login name.
pub const LOGIN_SETTING: &str = "Login";

/// Setting holding the operator password hash (never plaintext).
pub const PASSWORD_SETTING: &str = "Password";

/// Get/set access to named string properties owned by an external store.
pub trait Settings: Send + Sync {
    /// Current value of `name`, if set.
    fn get(&self, name: &str) -> Option<String>;

    /// Persist `value` under `name`, replacing any previous value.
    fn set(&self, name: &str, value: &str) -> Result<()>;
}
