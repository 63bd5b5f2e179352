use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors raised by persistent settings stores.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write settings file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("settings file {path} is not a flat name = \"value\" table: {reason}")]
    Format { path: String, reason: String },

    #[error("failed to encode settings: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("invalid setting name `{0}`")]
    InvalidName(String),
}

/// TLS identity errors.
#[derive(Error, Debug)]
pub enum TlsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no certificates found in {0}")]
    NoCertificates(String),

    #[error("invalid PEM in {path}: {reason}")]
    Pem { path: String, reason: String },

    #[error("failed to generate self-signed certificate: {0}")]
    Generate(#[from] rcgen::Error),

    #[error("invalid TLS configuration: {0}")]
    Config(#[from] rustls::Error),
}

/// Remote-control server lifecycle errors.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("server already started")]
    AlreadyStarted,

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server task failed: {0}")]
    Task(String),
}

/// Errors produced while tokenizing one command line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("no command given")]
    NoCommand,

    #[error("malformed parameter `{0}` (expected key or key=value)")]
    MalformedParameter(String),
}

/// Failures reported by a command at the dispatch boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("missing parameter `{0}`")]
    MissingParameter(&'static str),

    #[error("invalid value for `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("unknown bot `{0}`")]
    UnknownBot(String),

    #[error("{0}")]
    Backend(String),

    #[error("command panicked: {0}")]
    Panicked(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Tls(#[from] TlsError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        // dialoguer::Error wraps an IO error
        Error::Io(std::io::Error::other(err.to_string()))
    }
}

impl From<password_hash::Error> for Error {
    fn from(err: password_hash::Error) -> Self {
        Error::PasswordHash(err.to_string())
    }
}

impl From<Error> for CommandError {
    fn from(err: Error) -> Self {
        match err {
            Error::Command(inner) => inner,
            other => CommandError::Backend(other.to_string()),
        }
    }
}
