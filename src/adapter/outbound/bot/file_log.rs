use std::fs;
use std::path::PathBuf;

use crate::error::Result;
use crate::port::Bot;

/// A bot whose activity log lives in a file on disk.
#[derive(Debug)]
pub struct LogFileBot {
    name: String,
    log_path: Option<PathBuf>,
    stopped: bool,
}

impl LogFileBot {
    #[must_use]
    pub fn new(name: impl Into<String>, log_path: Option<PathBuf>, stopped: bool) -> Self {
        Self {
            name: name.into(),
            log_path,
            stopped,
        }
    }
}

impl Bot for LogFileBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Empty when no log file is configured.
    fn log(&self) -> Result<String> {
        match &self.log_path {
            Some(path) => Ok(fs::read_to_string(path)?),
            None => Ok(String::new()),
        }
    }
}
