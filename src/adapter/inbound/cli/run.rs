//! Handler for the `run` command.

use tokio::signal;
use tracing::{error, info};

use crate::adapter::inbound::cli::command::ConfigPathArg;
use crate::adapter::inbound::cli::output;
use crate::error::{Result, ServerError};
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;

/// Execute the run command.
///
/// Serves until Ctrl+C, then waits for any connected client to leave.
pub async fn execute(args: &ConfigPathArg) -> Result<()> {
    let config = Config::load(&args.config)?;
    config.init_logging();
    info!(config = %args.config.display(), "edgectl starting");

    let mut server = bootstrap::build_server(&config)?;
    let addr = server.start().await?;

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Listening", addr);
    output::field("Bots", config.bots.len());

    tokio::select! {
        result = server.closed() => {
            result?;
            error!("Listener stopped unexpectedly");
            return Err(ServerError::Task("listener stopped unexpectedly".to_string()).into());
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received (Ctrl+C)");
        }
    }

    output::note("Stopping; a connected client keeps the server up until it disconnects");
    server.stop().await?;
    info!("edgectl stopped");
    Ok(())
}
