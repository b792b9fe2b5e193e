//! CLI mode
//!
//! Builds the startup context from the loaded configuration and hands the
//! parsed command to the CLI implementation.

use crate::cli::Commands;
use crate::config::StaticConfig;
use crate::interfaces::cli::{CliError, run_cli_command, run_offline_command};
use crate::runtime::lifetime;

/// Run CLI mode
pub async fn run_cli(config: &StaticConfig, command: Commands) -> Result<(), CliError> {
    if let Some(result) = run_offline_command(&command).await {
        return result;
    }

    let ctx = lifetime::prepare_startup(config)
        .map_err(|e| CliError::CommandError(format!("{:#}", e)))?;
    run_cli_command(&ctx, command).await
}
