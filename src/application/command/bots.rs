//! Bot inspection commands.

use std::sync::Arc;

use serde_json::{json, Value};

use super::{required, Command, CommandContext};
use crate::domain::ParameterMap;
use crate::error::CommandError;
use crate::port::{Bot, BotRegistry};

/// Lines returned by `botlog` when `lines` is not given.
pub const DEFAULT_LOG_LINES: usize = 50;

fn lookup(bots: &dyn BotRegistry, name: &str) -> Result<Arc<dyn Bot>, CommandError> {
    bots.bot(name)
        .ok_or_else(|| CommandError::UnknownBot(name.to_string()))
}

fn status(bot: &dyn Bot) -> Value {
    json!({
        "name": bot.name(),
        "active": !bot.is_stopped(),
    })
}

/// Lists every registered bot with an `active` flag.
pub struct ListBotsCommand {
    bots: Arc<dyn BotRegistry>,
}

impl ListBotsCommand {
    #[must_use]
    pub fn new(bots: Arc<dyn BotRegistry>) -> Self {
        Self { bots }
    }
}

impl Command for ListBotsCommand {
    fn name(&self) -> &str {
        "listbots"
    }

    fn description(&self) -> &str {
        "List all bots and whether each is active"
    }

    fn execute(&self, _ctx: &CommandContext<'_>, _params: &ParameterMap) -> Result<Value, CommandError> {
        let bots = self
            .bots
            .names()
            .iter()
            .filter_map(|name| self.bots.bot(name))
            .map(|bot| status(bot.as_ref()))
            .collect::<Vec<_>>();
        Ok(Value::Array(bots))
    }
}

/// Reports one bot's state: `botstatus name=<bot>`.
pub struct BotStatusCommand {
    bots: Arc<dyn BotRegistry>,
}

impl BotStatusCommand {
    #[must_use]
    pub fn new(bots: Arc<dyn BotRegistry>) -> Self {
        Self { bots }
    }
}

impl Command for BotStatusCommand {
    fn name(&self) -> &str {
        "botstatus"
    }

    fn description(&self) -> &str {
        "Show whether one bot is active (name=<bot>)"
    }

    fn execute(&self, _ctx: &CommandContext<'_>, params: &ParameterMap) -> Result<Value, CommandError> {
        let name = required(params, "name")?;
        let bot = lookup(self.bots.as_ref(), name)?;
        Ok(status(bot.as_ref()))
    }
}

/// Tails one bot's log: `botlog name=<bot> [lines=N]`.
pub struct BotLogCommand {
    bots: Arc<dyn BotRegistry>,
}

impl BotLogCommand {
    #[must_use]
    pub fn new(bots: Arc<dyn BotRegistry>) -> Self {
        Self { bots }
    }
}

impl Command for BotLogCommand {
    fn name(&self) -> &str {
        "botlog"
    }

    fn description(&self) -> &str {
        "Show the tail of one bot's log (name=<bot> [lines=N])"
    }

    fn execute(&self, _ctx: &CommandContext<'_>, params: &ParameterMap) -> Result<Value, CommandError> {
        let name = required(params, "name")?;
        let limit = match params.value("lines") {
            None => DEFAULT_LOG_LINES,
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(CommandError::InvalidParameter {
                        name: "lines",
                        reason: format!("expected a positive integer, got `{raw}`"),
                    })
                }
            },
        };

        let bot = lookup(self.bots.as_ref(), name)?;
        let log = bot.log().map_err(|err| {
            CommandError::Backend(format!("failed to read log for bot `{name}`: {err}"))
        })?;

        let lines: Vec<&str> = log.lines().collect();
        let tail = &lines[lines.len().saturating_sub(limit)..];
        Ok(json!({
            "name": bot.name(),
            "lines": tail,
        }))
    }
}
