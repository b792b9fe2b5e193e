//! Summary and CSV export commands

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::runtime::lifetime::StartupContext;
use crate::utils::csv_handler::export_to_csv;
use crate::views::{CampaignQuery, Quarter};
use strum::IntoEnumIterator;

pub async fn show_summary(ctx: &StartupContext, search: Option<String>) -> Result<(), CliError> {
    let mut query = CampaignQuery::default();
    if let Some(keyword) = search {
        query = query.with_search(keyword);
    }
    let summary = ctx.campaigns.summary(&ctx.session, &query).await?;

    if summary.is_empty() {
        println!(
            "{} No campaigns in {}",
            "ℹ".bold().blue(),
            ctx.session.year().to_string().yellow()
        );
        return Ok(());
    }

    let header: Vec<String> = Quarter::iter().map(|q| format!("{:>4}", q)).collect();
    println!("{:<24}{}", "Brand".bold(), header.join("").bold());
    for (brand, counts) in summary.rows() {
        let cells: Vec<String> = Quarter::iter()
            .map(|q| format!("{:>4}", counts.get(q)))
            .collect();
        println!("{:<24}{}", brand.cyan(), cells.join(""));
    }
    Ok(())
}

pub async fn export_campaigns(
    ctx: &StartupContext,
    file_path: Option<String>,
) -> Result<(), CliError> {
    let path = file_path.unwrap_or_else(|| format!("{}.csv", ctx.session.collection()));
    let campaigns = ctx.store.list(ctx.session.collection()).await?;

    export_to_csv(&campaigns, &path)?;
    println!(
        "{} Exported {} campaign(s) to {}",
        "✓".bold().green(),
        campaigns.len(),
        path.blue()
    );
    Ok(())
}
