//! CLI interface module
//!
//! This module provides command-line interface functionality for brandtracker.

pub mod commands;

use std::fmt;

use crate::cli::{Commands, ConfigCommands};
use crate::errors::BrandtrackerError;
use crate::runtime::lifetime::StartupContext;
use commands::{
    add_campaign, config_management, delete_campaign, edit_campaign, export_campaigns,
    list_campaigns, reorder_campaigns, restore_version, show_campaign, show_history, show_summary,
};

#[derive(Debug)]
pub enum CliError {
    Service(BrandtrackerError),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::Service(err) => err.format_simple(),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::Service(err) => err.format_colored(),
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<BrandtrackerError> for CliError {
    fn from(err: BrandtrackerError) -> Self {
        CliError::Service(err)
    }
}

/// Commands that run without a store
pub async fn run_offline_command(cmd: &Commands) -> Option<Result<(), CliError>> {
    match cmd {
        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => Some(config_management::config_generate(output_path.clone(), *force).await),
        _ => None,
    }
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(ctx: &StartupContext, cmd: Commands) -> Result<(), CliError> {
    match cmd {
        Commands::Add { fields } => add_campaign(ctx, fields.into_fields()).await,

        Commands::Edit { id, fields } => edit_campaign(ctx, id, fields.into_fields()).await,

        Commands::Delete { id } => delete_campaign(ctx, id).await,

        Commands::Show { id } => show_campaign(ctx, id).await,

        Commands::List {
            search,
            brands,
            months,
            sort,
            desc,
            page,
            page_size,
        } => {
            let query = commands::build_query(search, brands, months, sort, desc, page, page_size);
            list_campaigns(ctx, query).await
        }

        Commands::Reorder { ids } => reorder_campaigns(ctx, ids).await,

        Commands::History { id } => show_history(ctx, id).await,

        Commands::Restore { id, timestamp } => restore_version(ctx, id, timestamp).await,

        Commands::Summary { search } => show_summary(ctx, search).await,

        Commands::Export { file_path } => export_campaigns(ctx, file_path).await,

        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => config_management::config_generate(output_path, force).await,
    }
}
