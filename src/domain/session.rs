//! Per-server operator session.

use chrono::{DateTime, Utc};

use super::auth::AuthState;

/// The authenticated-or-not context of the active client connection.
///
/// `started_at` is only ever set by [`Session::begin`], which is also the only
/// way into [`AuthState::LoggedIn`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    state: AuthState,
    started_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create a session in the `NotLoggedIn` state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current handshake state.
    #[must_use]
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// When the current login succeeded, if any.
    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Move through a pre-login handshake step.
    ///
    /// Entering `LoggedIn` this way is refused; use [`Session::begin`].
    pub fn advance(&mut self, state: AuthState) {
        if state.is_logged_in() {
            return;
        }
        self.state = state;
        self.started_at = None;
    }

    /// Mark the handshake complete at `now`.
    pub fn begin(&mut self, now: DateTime<Utc>) {
        self.state = AuthState::LoggedIn;
        self.started_at = Some(now);
    }

    /// Drop back to `NotLoggedIn`, forgetting any pending login.
    pub fn reset(&mut self) {
        self.state = AuthState::NotLoggedIn;
        self.started_at = None;
    }
}
