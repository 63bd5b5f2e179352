//! TLS remote-control server.
//!
//! A single listener accepts one client at a time. Each client walks through
//! the login handshake, then sends one command per line and receives one
//! rendered [`Response`](crate::domain::Response) per command followed by the
//! command prompt.
//!
//! # Capacity
//!
//! Only one client is served at a time. While a client is connected, further
//! TCP connections are accepted and closed immediately. Commands run on the
//! serving task, so a slow bot lookup also delays noticing new connections.
//!
//! # Example
//!
//! ```no_run
//! # async fn example(
//! #     tls: std::sync::Arc<rustls::ServerConfig>,
//! #     bots: std::sync::Arc<dyn edgectl::port::BotRegistry>,
//! # ) -> Result<(), edgectl::error::ServerError> {
//! use std::sync::Arc;
//! use edgectl::adapter::inbound::server::{RemoteServer, ServerOptions};
//! use edgectl::application::standard_registry;
//! use edgectl::domain::Credential;
//!
//! let credential = Arc::new(Credential::new("admin", "$argon2id$..."));
//! let mut server = RemoteServer::new(
//!     ServerOptions::new("127.0.0.1:8082", tls),
//!     credential,
//!     Arc::new(standard_registry(bots)),
//! );
//! let addr = server.start().await?;
//! println!("listening on {addr}");
//! server.stop().await?;
//! # Ok(())
//! # }
//! ```

mod connection;
mod listener;
mod render;

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_rustls::TlsAcceptor;
use tracing::info;

pub use render::{render, ResponseFormat};

use crate::application::{Authenticator, CommandRegistry};
use crate::domain::Credential;
use crate::error::ServerError;

/// Historical remote-control port.
pub const DEFAULT_PORT: u16 = 8082;

/// Default maximum session length in seconds.
pub const DEFAULT_MAX_SESSION_SECS: u64 = 30 * 60;

/// Default consecutive failed logins tolerated per connection.
pub const DEFAULT_MAX_LOGIN_ATTEMPTS: u32 = 3;

pub const LOGIN_PROMPT: &str = "Login: ";
pub const PASSWORD_PROMPT: &str = "Password: ";
pub const COMMAND_PROMPT: &str = "=>";
pub const LOGIN_SUCCEEDED: &str = "Login successful";
pub const LOGIN_FAILED: &str = "Login failed: invalid login or password";
pub const SESSION_EXPIRED: &str = "Session expired";
pub const TOO_MANY_ATTEMPTS: &str = "Too many failed attempts";
pub const LINE_TOO_LONG: &str = "Line too long";

/// Longest input line accepted, excluding the terminator.
pub const MAX_LINE_BYTES: usize = 8 * 1024;

/// Error message returned for a command line that is not valid UTF-8.
pub const INVALID_UTF8: &str = "invalid UTF-8 input";

/// Runtime settings for [`RemoteServer`].
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// `host:port` to listen on; port 0 picks a free port.
    pub bind_addr: String,
    pub tls: Arc<rustls::ServerConfig>,
    pub max_session_length: Duration,
    pub max_login_attempts: u32,
    pub response_format: ResponseFormat,
}

impl ServerOptions {
    /// Options with default limits and JSON responses.
    #[must_use]
    pub fn new(bind_addr: impl Into<String>, tls: Arc<rustls::ServerConfig>) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            tls,
            max_session_length: Duration::seconds(DEFAULT_MAX_SESSION_SECS as i64),
            max_login_attempts: DEFAULT_MAX_LOGIN_ATTEMPTS,
            response_format: ResponseFormat::default(),
        }
    }

    #[must_use]
    pub fn with_max_session_length(mut self, length: Duration) -> Self {
        self.max_session_length = length;
        self
    }

    #[must_use]
    pub fn with_max_login_attempts(mut self, attempts: u32) -> Self {
        self.max_login_attempts = attempts.max(1);
        self
    }

    #[must_use]
    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = format;
        self
    }
}

/// Everything the serving task reads; shared read-only.
pub(crate) struct ServeContext {
    pub(crate) authenticator: Authenticator,
    pub(crate) registry: Arc<CommandRegistry>,
    pub(crate) max_session_length: Duration,
    pub(crate) max_login_attempts: u32,
    pub(crate) response_format: ResponseFormat,
}

enum Lifecycle {
    Idle,
    Running {
        local_addr: SocketAddr,
        shutdown: watch::Sender<bool>,
        handle: JoinHandle<()>,
    },
    Stopped,
}

/// The remote-control server.
pub struct RemoteServer {
    options: ServerOptions,
    credential: Arc<Credential>,
    registry: Arc<CommandRegistry>,
    lifecycle: Lifecycle,
}

impl RemoteServer {
    #[must_use]
    pub fn new(
        options: ServerOptions,
        credential: Arc<Credential>,
        registry: Arc<CommandRegistry>,
    ) -> Self {
        Self {
            options,
            credential,
            registry,
            lifecycle: Lifecycle::Idle,
        }
    }

    /// Bind the listener and spawn the serving task.
    ///
    /// Only the first call starts the server; every later call fails with
    /// [`ServerError::AlreadyStarted`], even after [`RemoteServer::stop`].
    pub async fn start(&mut self) -> Result<SocketAddr, ServerError> {
        if !matches!(self.lifecycle, Lifecycle::Idle) {
            return Err(ServerError::AlreadyStarted);
        }

        let bind_error = |source| ServerError::Bind {
            addr: self.options.bind_addr.clone(),
            source,
        };
        let listener = TcpListener::bind(&self.options.bind_addr)
            .await
            .map_err(bind_error)?;
        let local_addr = listener.local_addr().map_err(bind_error)?;

        let ctx = Arc::new(ServeContext {
            authenticator: Authenticator::new(Arc::clone(&self.credential)),
            registry: Arc::clone(&self.registry),
            max_session_length: self.options.max_session_length,
            max_login_attempts: self.options.max_login_attempts.max(1),
            response_format: self.options.response_format,
        });
        let acceptor = TlsAcceptor::from(Arc::clone(&self.options.tls));
        let (shutdown, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(listener::run(
            listener,
            local_addr,
            acceptor,
            ctx,
            shutdown_rx,
        ));

        info!(%local_addr, commands = self.registry.len(), "Remote control started");
        self.lifecycle = Lifecycle::Running {
            local_addr,
            shutdown,
            handle,
        };
        Ok(local_addr)
    }

    /// Ask the serving task to finish and wait for it.
    ///
    /// An idle server stops at once. With a client connected, the task exits
    /// when that client disconnects; a pending read is not interrupted.
    pub async fn stop(&mut self) -> Result<(), ServerError> {
        match std::mem::replace(&mut self.lifecycle, Lifecycle::Stopped) {
            Lifecycle::Running {
                shutdown, handle, ..
            } => {
                let _ = shutdown.send(true);
                handle
                    .await
                    .map_err(|err| ServerError::Task(err.to_string()))?;
                info!("Remote control shut down");
                Ok(())
            }
            Lifecycle::Idle => {
                self.lifecycle = Lifecycle::Idle;
                Ok(())
            }
            Lifecycle::Stopped => Ok(()),
        }
    }

    /// Wait for the serving task to end on its own (fatal listener error).
    ///
    /// Cancel safe: dropping the future leaves the server running.
    pub async fn closed(&mut self) -> Result<(), ServerError> {
        let Lifecycle::Running { handle, .. } = &mut self.lifecycle else {
            return Ok(());
        };
        let result = handle
            .await
            .map_err(|err| ServerError::Task(err.to_string()));
        self.lifecycle = Lifecycle::Stopped;
        result
    }

    /// Address the listener is bound to, once started.
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        match &self.lifecycle {
            Lifecycle::Running { local_addr, .. } => Some(*local_addr),
            Lifecycle::Idle | Lifecycle::Stopped => None,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(&self.lifecycle, Lifecycle::Running { handle, .. } if !handle.is_finished())
    }
}

impl Drop for RemoteServer {
    fn drop(&mut self) {
        if let Lifecycle::Running { shutdown, .. } = &self.lifecycle {
            let _ = shutdown.send(true);
        }
    }
}
