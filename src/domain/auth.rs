//! Operator credential and login handshake state.

use std::fmt;

/// Stage of the interactive login handshake.
///
/// Exactly one value is active per session. `PasswordRequested` is transient:
/// it exists only between reading the password line and finishing verification.
#[derive(Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    /// Waiting for the operator to enter a login.
    #[default]
    NotLoggedIn,
    /// Login entered, waiting for the password.
    AccountRequested { login: String },
    /// Both halves entered, verification pending.
    PasswordRequested { login: String, password: String },
    /// Handshake complete; lines are commands.
    LoggedIn,
}

impl AuthState {
    /// Returns true once the handshake has completed.
    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        matches!(self, Self::LoggedIn)
    }

    /// Stable identifier used in logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotLoggedIn => "not_logged_in",
            Self::AccountRequested { .. } => "account_requested",
            Self::PasswordRequested { .. } => "password_requested",
            Self::LoggedIn => "logged_in",
        }
    }
}

// Never print the pending password.
impl fmt::Debug for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccountRequested { login } => f
                .debug_struct("AccountRequested")
                .field("login", login)
                .finish(),
            Self::PasswordRequested { login, .. } => f
                .debug_struct("PasswordRequested")
                .field("login", login)
                .field("password", &"<redacted>")
                .finish(),
            other => f.write_str(other.as_str()),
        }
    }
}

/// The single operator credential accepted by the server.
///
/// The password is held only as an Argon2 PHC hash string.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    login: String,
    password_hash: String,
}

impl Credential {
    /// Create a credential from a login and a password hash.
    #[must_use]
    pub fn new(login: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password_hash: password_hash.into(),
        }
    }

    /// A credential that can never authenticate.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self::new("", "")
    }

    /// The configured login name.
    #[must_use]
    pub fn login(&self) -> &str {
        &self.login
    }

    /// The stored password hash.
    #[must_use]
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Returns false when either half is missing.
    ///
    /// An unusable credential makes every login attempt fail.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.login.trim().is_empty() && !self.password_hash.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("login", &self.login)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}
