//! Operator commands.
//!
//! Every command implements [`Command`] and returns a JSON value on success.
//! Failures are [`CommandError`]s; the registry turns both into a
//! [`Response`](crate::domain::Response) at the dispatch boundary.

mod bots;
mod help;
mod session;
mod version;

use std::sync::Arc;

use serde_json::Value;

pub use bots::{BotLogCommand, BotStatusCommand, ListBotsCommand, DEFAULT_LOG_LINES};
pub use help::HelpCommand;
pub use session::SessionCommand;
pub use version::VersionCommand;

use super::registry::CommandRegistry;
use super::session::SessionSnapshot;
use crate::domain::ParameterMap;
use crate::error::CommandError;
use crate::port::BotRegistry;

/// A named unit of server functionality invoked from the line protocol.
pub trait Command: Send + Sync {
    /// Registry key; matched exactly and case-sensitively.
    fn name(&self) -> &str;

    /// One-line summary shown by `help`.
    fn description(&self) -> &str;

    /// Run the command.
    fn execute(&self, ctx: &CommandContext<'_>, params: &ParameterMap)
        -> Result<Value, CommandError>;
}

/// What a command can see about the server while it runs.
pub struct CommandContext<'a> {
    registry: &'a CommandRegistry,
    session: &'a SessionSnapshot,
}

impl<'a> CommandContext<'a> {
    #[must_use]
    pub fn new(registry: &'a CommandRegistry, session: &'a SessionSnapshot) -> Self {
        Self { registry, session }
    }

    /// The registry the command was dispatched from.
    #[must_use]
    pub fn registry(&self) -> &CommandRegistry {
        self.registry
    }

    #[must_use]
    pub fn session(&self) -> &SessionSnapshot {
        self.session
    }
}

/// The built-in command set wired to `bots`.
#[must_use]
pub fn standard_registry(bots: Arc<dyn BotRegistry>) -> CommandRegistry {
    CommandRegistry::builder()
        .register(HelpCommand)
        .register(ListBotsCommand::new(Arc::clone(&bots)))
        .register(BotStatusCommand::new(Arc::clone(&bots)))
        .register(BotLogCommand::new(bots))
        .register(SessionCommand)
        .register(VersionCommand)
        .build()
}

/// Value of a `key=value` parameter that must be present.
pub(crate) fn required<'p>(
    params: &'p ParameterMap,
    name: &'static str,
) -> Result<&'p str, CommandError> {
    params
        .value(name)
        .filter(|value| !value.is_empty())
        .ok_or(CommandError::MissingParameter(name))
}
