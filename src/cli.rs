//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for brandtracker using clap's derive macros.

use clap::{Args, Parser, Subcommand};

use crate::session::Role;
use crate::storage::{CampaignField, CampaignFields};

/// Brandtracker - campaign tracking with per-field edit history
#[derive(Parser)]
#[command(name = "brandtracker")]
#[command(version)]
#[command(about = "Track brand campaigns and roll back field edits", long_about = None)]
pub struct Cli {
    /// Configuration file (default: brandtracker.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    /// Year whose campaigns to operate on
    #[arg(long, short = 'y', global = true)]
    pub year: Option<u16>,

    /// Editor identity recorded in history entries
    #[arg(long, global = true)]
    pub editor: Option<String>,

    /// Acting role (admin, viewer)
    #[arg(long, global = true)]
    pub role: Option<Role>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Campaign field values given as flags; unset flags are left out
#[derive(Args, Debug, Default, Clone)]
pub struct FieldArgs {
    #[arg(long)]
    pub brand: Option<String>,

    /// Sale month, e.g. "March"
    #[arg(long)]
    pub sale_month: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long = "type")]
    pub campaign_type: Option<String>,

    #[arg(long)]
    pub page_location: Option<String>,

    /// YYYY-MM-DD
    #[arg(long)]
    pub start_date: Option<String>,

    /// YYYY-MM-DD
    #[arg(long)]
    pub end_date: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    #[arg(long)]
    pub image_url: Option<String>,
}

impl FieldArgs {
    pub fn into_fields(self) -> CampaignFields {
        [
            (CampaignField::Brand, self.brand),
            (CampaignField::SaleMonth, self.sale_month),
            (CampaignField::CampaignName, self.name),
            (CampaignField::CampaignType, self.campaign_type),
            (CampaignField::PageLocation, self.page_location),
            (CampaignField::StartDate, self.start_date),
            (CampaignField::EndDate, self.end_date),
            (CampaignField::EngagementNotes, self.notes),
            (CampaignField::ImageUrl, self.image_url),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect()
    }
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Add a campaign
    Add {
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Edit a campaign; only the given fields are changed
    Edit {
        /// Campaign id
        id: String,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Delete a campaign
    Delete {
        /// Campaign id
        id: String,
    },

    /// Show one campaign
    Show {
        /// Campaign id
        id: String,
    },

    /// List campaigns
    List {
        /// Case-insensitive match on brand or campaign name
        #[arg(long, short = 's')]
        search: Option<String>,

        /// Only these brands (repeatable)
        #[arg(long = "brand")]
        brands: Vec<String>,

        /// Only these sale months (repeatable)
        #[arg(long = "month")]
        months: Vec<String>,

        /// Sort field, e.g. brand, startDate
        #[arg(long)]
        sort: Option<CampaignField>,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Page number (1-based)
        #[arg(long, short = 'p', default_value_t = 1)]
        page: usize,

        /// Page size (default from config)
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Set the display order; listed campaigns take positions 0, 1, 2, ...
    Reorder {
        /// Campaign ids in their new order
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Show a campaign's edit history, newest first
    History {
        /// Campaign id
        id: String,
    },

    /// Restore a campaign to the values before a history entry (admin only)
    Restore {
        /// Campaign id
        id: String,

        /// Entry timestamp (RFC3339), as shown by `history`
        timestamp: String,
    },

    /// Brand appearances per quarter
    Summary {
        /// Case-insensitive match on brand or campaign name
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Export the year's campaigns to CSV
    Export {
        /// Output file path (default: campaigns_<year>.csv)
        file_path: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: brandtracker.example.toml)
        output_path: Option<String>,

        /// Force overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_edit_with_partial_fields() {
        let cli = Cli::try_parse_from([
            "brandtracker",
            "--year",
            "2024",
            "edit",
            "abc",
            "--brand",
            "Acme",
            "--end-date",
            "2024-03-31",
        ])
        .unwrap();
        assert_eq!(cli.year, Some(2024));

        let Commands::Edit { id, fields } = cli.command else {
            panic!("expected edit");
        };
        assert_eq!(id, "abc");
        let fields = fields.into_fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get(CampaignField::Brand), Some("Acme"));
        assert_eq!(fields.get(CampaignField::EndDate), Some("2024-03-31"));
    }

    #[test]
    fn test_parse_global_role_after_subcommand() {
        let cli = Cli::try_parse_from(["brandtracker", "restore", "abc", "2024-01-01T00:00:00Z", "--role", "admin"])
            .unwrap();
        assert_eq!(cli.role, Some(Role::Admin));
    }

    #[test]
    fn test_parse_reorder_ids() {
        let cli = Cli::try_parse_from(["brandtracker", "reorder", "b", "a", "c"]).unwrap();
        let Commands::Reorder { ids } = cli.command else {
            panic!("expected reorder");
        };
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_parse_list_sort_field() {
        let cli = Cli::try_parse_from(["brandtracker", "list", "--sort", "startDate", "--desc"]).unwrap();
        let Commands::List { sort, desc, page, .. } = cli.command else {
            panic!("expected list");
        };
        assert_eq!(sort, Some(CampaignField::StartDate));
        assert!(desc);
        assert_eq!(page, 1);
    }
}
