//! Session lifetime enforcement.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::domain::Session;

/// Owns the serving task's [`Session`] and answers whether it is still valid.
#[derive(Debug, Clone)]
pub struct SessionManager {
    session: Session,
    max_length: Duration,
}

impl SessionManager {
    /// Create a manager with a fresh `NotLoggedIn` session.
    #[must_use]
    pub fn new(max_length: Duration) -> Self {
        Self {
            session: Session::new(),
            max_length,
        }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    #[must_use]
    pub fn max_length(&self) -> Duration {
        self.max_length
    }

    /// True while a login is active and younger than the maximum length.
    ///
    /// A session whose age equals the maximum length has expired.
    #[must_use]
    pub fn is_authenticated_at(&self, now: DateTime<Utc>) -> bool {
        match self.session.started_at() {
            Some(started_at) if self.session.state().is_logged_in() => {
                now - started_at < self.max_length
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated_at(Utc::now())
    }

    /// When the current login stops being valid.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.session
            .started_at()
            .map(|started_at| started_at + self.max_length)
    }

    /// Drop back to `NotLoggedIn`.
    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Point-in-time view handed to commands.
    #[must_use]
    pub fn snapshot(&self, now: DateTime<Utc>) -> SessionSnapshot {
        let expires_at = self.expires_at();
        let remaining_secs = expires_at.map(|at| (at - now).num_seconds().max(0));
        SessionSnapshot {
            state: self.session.state().as_str(),
            started_at: self.session.started_at(),
            expires_at,
            remaining_secs,
        }
    }
}

/// Serializable session summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub state: &'static str,
    pub started_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub remaining_secs: Option<i64>,
}

impl SessionSnapshot {
    /// Snapshot of a session that never logged in.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            state: Session::new().state().as_str(),
            started_at: None,
            expires_at: None,
            remaining_secs: None,
        }
    }
}
