use serde_json::Value;

use super::{Command, CommandContext};
use crate::domain::ParameterMap;
use crate::error::CommandError;

/// Reports when the current login started and when it expires.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionCommand;

impl Command for SessionCommand {
    fn name(&self) -> &str {
        "session"
    }

    fn description(&self) -> &str {
        "Show the current session start, expiry and remaining seconds"
    }

    fn execute(&self, ctx: &CommandContext<'_>, _params: &ParameterMap) -> Result<Value, CommandError> {
        serde_json::to_value(ctx.session()).map_err(|err| CommandError::Backend(err.to_string()))
    }
}
