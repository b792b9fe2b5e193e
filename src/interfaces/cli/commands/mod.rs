//! CLI command implementations

mod campaign_management;
pub mod config_management;
mod history;
mod report;

pub use campaign_management::{
    add_campaign, build_query, delete_campaign, edit_campaign, list_campaigns, reorder_campaigns,
    show_campaign,
};
pub use history::{restore_version, show_history};
pub use report::{export_campaigns, show_summary};
