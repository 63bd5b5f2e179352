//! Command-line definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::adapter::inbound::cli::paths;

#[derive(Parser, Debug)]
#[command(name = "edgectl")]
#[command(version, about = "TLS remote control for edgelord bots")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the remote-control server in the foreground
    Run(ConfigPathArg),

    /// Print an Argon2 hash for a password
    HashPassword(PasswordSourceArgs),

    /// Store the operator login and password in the settings file
    SetCredentials(SetCredentialsArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Validate a configuration file
    Validate(ConfigPathArg),
}

#[derive(Args, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file
    #[arg(short, long, default_value_os_t = paths::default_config())]
    pub config: PathBuf,
}

#[derive(Args, Debug)]
pub struct PasswordSourceArgs {
    /// Read the password from the first line of stdin instead of prompting
    #[arg(long)]
    pub password_stdin: bool,
}

#[derive(Args, Debug)]
pub struct SetCredentialsArgs {
    /// Operator login name
    #[arg(long)]
    pub login: String,

    /// Settings file to write (defaults to the one named in the config)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Configuration file consulted when --settings is absent
    #[arg(short, long, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    #[command(flatten)]
    pub password: PasswordSourceArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_takes_config_path() {
        let cli = Cli::parse_from(["edgectl", "run", "--config", "/etc/edgectl.toml"]);
        match cli.command {
            Commands::Run(args) => assert_eq!(args.config, PathBuf::from("/etc/edgectl.toml")),
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn config_defaults_to_home_path() {
        let cli = Cli::parse_from(["edgectl", "config", "validate"]);
        match cli.command {
            Commands::Config(ConfigCommand::Validate(args)) => {
                assert_eq!(args.config, paths::default_config());
            }
            other => panic!("expected config validate, got {other:?}"),
        }
    }

    #[test]
    fn set_credentials_requires_login() {
        assert!(Cli::try_parse_from(["edgectl", "set-credentials"]).is_err());

        let cli = Cli::parse_from([
            "edgectl",
            "set-credentials",
            "--login",
            "admin",
            "--settings",
            "s.toml",
            "--password-stdin",
        ]);
        match cli.command {
            Commands::SetCredentials(args) => {
                assert_eq!(args.login, "admin");
                assert_eq!(args.settings, Some(PathBuf::from("s.toml")));
                assert!(args.password.password_stdin);
            }
            other => panic!("expected set-credentials, got {other:?}"),
        }
    }
}
