//! Command registry and dispatch boundary.
//!
//! The registry is assembled once through [`CommandRegistryBuilder`] and is
//! read-only afterwards. [`CommandRegistry::dispatch_line`] is the single place
//! where parse errors, unknown names, command errors and panics are all turned
//! into failure [`Response`]s.

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, error, warn};

use super::command::{Command, CommandContext};
use super::protocol::parse_line;
use super::session::SessionSnapshot;
use crate::domain::{ParameterMap, Response};
use crate::error::CommandError;

/// Immutable name to command mapping.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, Arc<dyn Command>>,
}

impl CommandRegistry {
    #[must_use]
    pub fn builder() -> CommandRegistryBuilder {
        CommandRegistryBuilder::default()
    }

    /// Exact, case-sensitive lookup.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Command>> {
        self.commands.get(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// `name - description` for every command, sorted by name.
    #[must_use]
    pub fn descriptions(&self) -> Vec<String> {
        self.commands
            .values()
            .map(|command| format!("{} - {}", command.name(), command.description()))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Parse one protocol line and run the named command.
    pub fn dispatch_line(&self, line: &str, session: &SessionSnapshot) -> Response {
        match parse_line(line) {
            Ok(parsed) => self.dispatch(&parsed.name, &parsed.params, session),
            Err(err) => {
                debug!(error = %err, "Rejected malformed command line");
                Response::error(err.to_string())
            }
        }
    }

    /// Run `name` with `params`.
    ///
    /// Never fails: unknown names, command errors and panics all come back as
    /// failure responses.
    pub fn dispatch(&self, name: &str, params: &ParameterMap, session: &SessionSnapshot) -> Response {
        let Some(command) = self.get(name) else {
            warn!(command = name, "Unknown command");
            return Response::error(CommandError::UnknownCommand(name.to_string()).to_string());
        };

        let ctx = CommandContext::new(self, session);
        let outcome = catch_unwind(AssertUnwindSafe(|| command.execute(&ctx, params)))
            .unwrap_or_else(|payload| Err(CommandError::Panicked(panic_message(payload.as_ref()))));

        match outcome {
            Ok(result) => {
                debug!(command = name, "Command succeeded");
                Response::ok(result)
            }
            Err(err) => {
                error!(command = name, error = %err, "Command failed");
                Response::error(err.to_string())
            }
        }
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.commands.keys()).finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Collects commands before the server starts.
#[derive(Default)]
pub struct CommandRegistryBuilder {
    commands: BTreeMap<String, Arc<dyn Command>>,
}

impl CommandRegistryBuilder {
    /// Add a command. A later command with the same name replaces the earlier one.
    #[must_use]
    pub fn register<C: Command + 'static>(self, command: C) -> Self {
        self.register_arc(Arc::new(command))
    }

    /// Add an already shared command.
    #[must_use]
    pub fn register_arc(mut self, command: Arc<dyn Command>) -> Self {
        let name = command.name().to_string();
        if self.commands.insert(name.clone(), command).is_some() {
            warn!(command = %name, "Replacing previously registered command");
        }
        self
    }

    #[must_use]
    pub fn build(self) -> CommandRegistry {
        CommandRegistry {
            commands: self.commands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::command::{HelpCommand, ListBotsCommand};
    use crate::testkit::bots::{FakeBot, FakeBotRegistry};
    use serde_json::{json, Value};

    struct Failing;

    impl Command for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn description(&self) -> &str {
            "Always fails"
        }

        fn execute(&self, _ctx: &CommandContext<'_>, _params: &ParameterMap) -> Result<Value, CommandError> {
            Err(CommandError::UnknownBot("ghost".into()))
        }
    }

    struct Panicking;

    impl Command for Panicking {
        fn name(&self) -> &str {
            "panicking"
        }

        fn description(&self) -> &str {
            "Always panics"
        }

        fn execute(&self, _ctx: &CommandContext<'_>, _params: &ParameterMap) -> Result<Value, CommandError> {
            panic!("exchange adapter exploded");
        }
    }

    struct Echo;

    impl Command for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo parameters"
        }

        fn execute(&self, _ctx: &CommandContext<'_>, params: &ParameterMap) -> Result<Value, CommandError> {
            let mut keys: Vec<_> = params.iter().map(|(key, _)| key.to_string()).collect();
            keys.sort();
            Ok(json!(keys))
        }
    }

    fn bots() -> Arc<FakeBotRegistry> {
        Arc::new(FakeBotRegistry::new(vec![
            FakeBot::running("alpha"),
            FakeBot::stopped("beta"),
        ]))
    }

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot::anonymous()
    }

    #[test]
    fn unknown_command_is_a_failure_response() {
        let registry = CommandRegistry::builder().register(HelpCommand).build();
        let response = registry.dispatch_line("frobnicate", &snapshot());
        assert!(!response.is_success());
        let message = response.error_message().unwrap();
        assert!(message.contains("frobnicate"));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let registry = CommandRegistry::builder().register(HelpCommand).build();
        assert!(registry.get("help").is_some());
        assert!(registry.get("HELP").is_none());
        assert!(!registry.dispatch_line("Help", &snapshot()).is_success());
    }

    #[test]
    fn help_lists_commands_registered_after_it() {
        let registry = CommandRegistry::builder()
            .register(HelpCommand)
            .register(ListBotsCommand::new(bots()))
            .build();
        let response = registry.dispatch_line("help", &snapshot());
        let descriptions = response.result().as_array().unwrap();
        assert_eq!(descriptions.len(), 2);
    }

    #[test]
    fn help_is_independent_of_registration_order() {
        let forward = CommandRegistry::builder()
            .register(HelpCommand)
            .register(ListBotsCommand::new(bots()))
            .build();
        let reverse = CommandRegistry::builder()
            .register(ListBotsCommand::new(bots()))
            .register(HelpCommand)
            .build();
        assert_eq!(
            forward.dispatch_line("help", &snapshot()),
            reverse.dispatch_line("help", &snapshot())
        );
    }

    #[test]
    fn command_error_becomes_failure_response() {
        let registry = CommandRegistry::builder().register(Failing).build();
        let response = registry.dispatch_line("failing", &snapshot());
        assert_eq!(response, Response::error("unknown bot `ghost`"));
    }

    #[test]
    fn panic_is_caught_at_dispatch_boundary() {
        let registry = CommandRegistry::builder().register(Panicking).build();
        let response = registry.dispatch_line("panicking", &snapshot());
        assert!(!response.is_success());
        assert!(response
            .error_message()
            .unwrap()
            .contains("exchange adapter exploded"));
    }

    #[test]
    fn malformed_parameter_does_not_invoke_command() {
        let registry = CommandRegistry::builder().register(Panicking).build();
        let response = registry.dispatch_line("panicking a=1 b c=3=4", &snapshot());
        assert!(!response.is_success());
        assert!(response.error_message().unwrap().contains("c=3=4"));
    }

    #[test]
    fn parameters_reach_the_command() {
        let registry = CommandRegistry::builder().register(Echo).build();
        let response = registry.dispatch_line("echo b=2 a", &snapshot());
        assert_eq!(response, Response::ok(json!(["a", "b"])));
    }

    #[test]
    fn empty_line_reports_missing_command() {
        let registry = CommandRegistry::builder().build();
        let response = registry.dispatch_line("   ", &snapshot());
        assert_eq!(response.error_message(), Some("no command given"));
    }

    #[test]
    fn later_registration_replaces_earlier() {
        let registry = CommandRegistry::builder()
            .register(Failing)
            .register(Failing)
            .build();
        assert_eq!(registry.len(), 1);
    }
}
