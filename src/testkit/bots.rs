//! In-memory bots for command and server tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::port::{Bot, BotRegistry};

/// A bot with a fixed state and log.
#[derive(Debug, Clone)]
pub struct FakeBot {
    name: String,
    stopped: bool,
    log: Option<String>,
}

impl FakeBot {
    pub fn running(name: &str) -> Self {
        Self {
            name: name.to_string(),
            stopped: false,
            log: Some(String::new()),
        }
    }

    pub fn stopped(name: &str) -> Self {
        Self {
            stopped: true,
            ..Self::running(name)
        }
    }

    pub fn with_log(mut self, log: &str) -> Self {
        self.log = Some(log.to_string());
        self
    }

    /// Make every `log()` call fail.
    pub fn with_failing_log(mut self) -> Self {
        self.log = None;
        self
    }
}

impl Bot for FakeBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn log(&self) -> Result<String> {
        self.log
            .clone()
            .ok_or_else(|| Error::Io(std::io::Error::other("log unavailable")))
    }
}

/// Registry over a fixed set of [`FakeBot`]s.
#[derive(Debug, Default)]
pub struct FakeBotRegistry {
    bots: BTreeMap<String, Arc<FakeBot>>,
}

impl FakeBotRegistry {
    pub fn new(bots: Vec<FakeBot>) -> Self {
        Self {
            bots: bots
                .into_iter()
                .map(|bot| (bot.name.clone(), Arc::new(bot)))
                .collect(),
        }
    }

    /// `alpha` (running, three log lines) and `beta` (stopped).
    pub fn sample() -> Self {
        Self::new(vec![
            FakeBot::running("alpha").with_log("started\nscanning\nquiet market\n"),
            FakeBot::stopped("beta"),
        ])
    }
}

impl BotRegistry for FakeBotRegistry {
    fn bot(&self, name: &str) -> Option<Arc<dyn Bot>> {
        self.bots
            .get(name)
            .map(|bot| Arc::clone(bot) as Arc<dyn Bot>)
    }

    fn names(&self) -> Vec<String> {
        self.bots.keys().cloned().collect()
    }
}
