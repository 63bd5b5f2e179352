//! Interactive login handshake.
//!
//! The [`Authenticator`] is a pure state machine over [`Session`]: it never
//! touches the socket. The serving loop feeds it one line per turn and writes
//! whatever prompt the returned [`AuthOutcome`] calls for.

use std::sync::Arc;

use argon2::Argon2;
use chrono::{DateTime, Utc};
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use tracing::{debug, info, warn};

use crate::domain::{AuthState, Credential, Session};
use crate::error::Result;

/// Salt used to burn the same Argon2 work when no stored hash is usable.
const DECOY_SALT: &str = "ZWRnZWN0bGRlY295c2FsdA";

/// What the serving loop should do after one handshake line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Login recorded; ask for the password.
    PasswordRequired,
    /// Credential verified; the session has started.
    LoggedIn,
    /// Credential rejected; ask for the login again.
    Rejected,
    /// The session was already logged in; nothing changed.
    AlreadyLoggedIn,
}

/// Drives [`AuthState`] transitions against the configured credential.
#[derive(Debug, Clone)]
pub struct Authenticator {
    credential: Arc<Credential>,
}

impl Authenticator {
    #[must_use]
    pub fn new(credential: Arc<Credential>) -> Self {
        if !credential.is_usable() {
            warn!("Operator credential is not configured; every login attempt will fail");
        }
        Self { credential }
    }

    /// Feed one input line received while not yet logged in.
    ///
    /// `now` becomes the session start time on success.
    pub fn handle_line(&self, session: &mut Session, line: &str, now: DateTime<Utc>) -> AuthOutcome {
        match session.state().clone() {
            AuthState::NotLoggedIn => {
                session.advance(AuthState::AccountRequested {
                    login: line.to_string(),
                });
                AuthOutcome::PasswordRequired
            }
            AuthState::AccountRequested { login } => {
                session.advance(AuthState::PasswordRequested {
                    login,
                    password: line.to_string(),
                });
                self.complete(session, now)
            }
            AuthState::PasswordRequested { .. } => self.complete(session, now),
            AuthState::LoggedIn => AuthOutcome::AlreadyLoggedIn,
        }
    }

    fn complete(&self, session: &mut Session, now: DateTime<Utc>) -> AuthOutcome {
        let (login, password) = match session.state() {
            AuthState::PasswordRequested { login, password } => (login.clone(), password.clone()),
            _ => {
                session.reset();
                return AuthOutcome::Rejected;
            }
        };

        if self.verify(&login, &password) {
            info!("Operator logged in");
            session.begin(now);
            AuthOutcome::LoggedIn
        } else {
            warn!(login_len = login.len(), "Operator login rejected");
            session.reset();
            AuthOutcome::Rejected
        }
    }

    /// Check a login/password pair against the configured credential.
    ///
    /// Argon2 verification runs whether or not the login matches, and the
    /// login comparison is constant time.
    #[must_use]
    pub fn verify(&self, login: &str, password: &str) -> bool {
        let login_matches = constant_time_eq(login.as_bytes(), self.credential.login().as_bytes());

        let password_matches = match PasswordHash::new(self.credential.password_hash()) {
            Ok(hash) => Argon2::default()
                .verify_password(password.as_bytes(), &hash)
                .is_ok(),
            Err(err) => {
                debug!(error = %err, "Stored password hash is unusable");
                burn_decoy_hash(password);
                false
            }
        };

        self.credential.is_usable() && login_matches && password_matches
    }
}

/// Hash `password` into an Argon2id PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

fn burn_decoy_hash(password: &str) {
    if let Ok(salt) = SaltString::from_b64(DECOY_SALT) {
        let _ = Argon2::default().hash_password(password.as_bytes(), &salt);
    }
}

/// Compare two byte strings without short-circuiting on the first mismatch.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let len = a.len().max(b.len());
    let mut diff = u8::from(a.len() != b.len());
    for i in 0..len {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        diff |= x ^ y;
    }
    diff == 0
}
