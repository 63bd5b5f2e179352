use serde_json::Value;

use super::{Command, CommandContext};
use crate::domain::ParameterMap;
use crate::error::CommandError;

/// Lists every registered command.
///
/// Reads the registry at call time, so commands registered after this one
/// are included.
#[derive(Debug, Clone, Copy, Default)]
pub struct HelpCommand;

impl Command for HelpCommand {
    fn name(&self) -> &str {
        "help"
    }

    fn description(&self) -> &str {
        "List all available commands"
    }

    fn execute(&self, ctx: &CommandContext<'_>, _params: &ParameterMap) -> Result<Value, CommandError> {
        Ok(Value::from(ctx.registry().descriptions()))
    }
}
