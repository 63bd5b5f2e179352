use clap::Parser;
use edgectl::adapter::inbound::cli::command::{Cli, Commands, ConfigCommand};
use edgectl::adapter::inbound::cli::{config, credentials, output, run};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Run(args) => run::execute(args).await,
        Commands::HashPassword(args) => credentials::execute_hash_password(args),
        Commands::SetCredentials(args) => credentials::execute_set_credentials(args),
        Commands::Config(ConfigCommand::Validate(args)) => config::execute_validate(&args.config),
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
