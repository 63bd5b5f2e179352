use serde_json::{json, Value};

use super::{Command, CommandContext};
use crate::domain::ParameterMap;
use crate::error::CommandError;

#[derive(Debug, Clone, Copy, Default)]
pub struct VersionCommand;

impl Command for VersionCommand {
    fn name(&self) -> &str {
        "version"
    }

    fn description(&self) -> &str {
        "Show the server build version"
    }

    fn execute(&self, _ctx: &CommandContext<'_>, _params: &ParameterMap) -> Result<Value, CommandError> {
        Ok(json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        }))
    }
}
