//! Campaign add / edit / delete / show / list commands

use colored::Colorize;

use crate::config::get_config;
use crate::interfaces::cli::CliError;
use crate::runtime::lifetime::StartupContext;
use crate::storage::{Campaign, CampaignField, CampaignFields, CampaignId};
use crate::utils::format_date_dmy;
use crate::views::{CampaignQuery, SortDirection};

fn print_campaign(campaign: &Campaign) {
    println!("{} {}", "ID:".bold(), campaign.id.to_string().cyan());
    for field in [
        CampaignField::Brand,
        CampaignField::CampaignName,
        CampaignField::SaleMonth,
        CampaignField::CampaignType,
        CampaignField::PageLocation,
        CampaignField::StartDate,
        CampaignField::EndDate,
        CampaignField::EngagementNotes,
        CampaignField::ImageUrl,
    ] {
        let value = campaign.get(field);
        let shown = if field.is_date() {
            format_date_dmy(value)
        } else {
            value.to_string()
        };
        println!("  {:<18} {}", format!("{}:", field.label()).dimmed(), shown);
    }
    println!(
        "  {:<18} {}",
        "Edits:".dimmed(),
        campaign.edit_history.len().to_string().yellow()
    );
}

pub async fn add_campaign(ctx: &StartupContext, fields: CampaignFields) -> Result<(), CliError> {
    let campaign = ctx.campaigns.create_campaign(&ctx.session, fields).await?;
    println!(
        "{} Added campaign: {} ({})",
        "✓".bold().green(),
        campaign.campaign_name.cyan(),
        campaign.id.to_string().magenta()
    );
    Ok(())
}

pub async fn edit_campaign(
    ctx: &StartupContext,
    id: String,
    fields: CampaignFields,
) -> Result<(), CliError> {
    if fields.is_empty() {
        return Err(CliError::CommandError(
            "Nothing to edit; pass at least one field flag".to_string(),
        ));
    }

    let id = CampaignId::new(id);
    let outcome = ctx.campaigns.apply_edit(&ctx.session, &id, fields).await?;

    match outcome.entry {
        Some(entry) => {
            println!(
                "{} Updated campaign {} ({} field(s) changed)",
                "✓".bold().green(),
                id.to_string().cyan(),
                entry.changes.len()
            );
            for (field, change) in &entry.changes {
                println!("  {} {}", format!("{}:", field.label()).dimmed(), change);
            }
        }
        None => println!(
            "{} No changes for campaign {}",
            "ℹ".bold().blue(),
            id.to_string().cyan()
        ),
    }
    Ok(())
}

pub async fn delete_campaign(ctx: &StartupContext, id: String) -> Result<(), CliError> {
    let id = CampaignId::new(id);
    ctx.campaigns.delete_campaign(&ctx.session, &id).await?;
    println!(
        "{} Deleted campaign: {}",
        "✓".bold().green(),
        id.to_string().cyan()
    );
    Ok(())
}

pub async fn show_campaign(ctx: &StartupContext, id: String) -> Result<(), CliError> {
    let campaign = ctx
        .campaigns
        .get_campaign(&ctx.session, &CampaignId::new(id))
        .await?;
    print_campaign(&campaign);
    Ok(())
}

pub async fn reorder_campaigns(ctx: &StartupContext, ids: Vec<String>) -> Result<(), CliError> {
    let ids: Vec<CampaignId> = ids.into_iter().map(CampaignId::new).collect();
    ctx.campaigns.reorder(&ctx.session, &ids).await?;
    println!(
        "{} Saved display order of {} campaign(s)",
        "✓".bold().green(),
        ids.len()
    );
    Ok(())
}

pub fn build_query(
    search: Option<String>,
    brands: Vec<String>,
    months: Vec<String>,
    sort: Option<CampaignField>,
    desc: bool,
    page: usize,
    page_size: Option<usize>,
) -> CampaignQuery {
    let page_size = page_size.unwrap_or_else(|| get_config().view.page_size);
    let mut query = CampaignQuery::new(page_size)
        .with_brands(brands)
        .with_months(months);
    if let Some(keyword) = search {
        query = query.with_search(keyword);
    }
    if let Some(field) = sort {
        let direction = if desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        query = query.sorted_by(field, direction);
    }
    query.at_page(page)
}

pub async fn list_campaigns(ctx: &StartupContext, query: CampaignQuery) -> Result<(), CliError> {
    let page = ctx.campaigns.list_campaigns(&ctx.session, &query).await?;

    if page.items.is_empty() {
        println!(
            "{} No campaigns in {}",
            "ℹ".bold().blue(),
            ctx.session.year().to_string().yellow()
        );
        return Ok(());
    }

    println!(
        "{} {} ({} total)",
        "Campaigns".bold().green(),
        ctx.session.year().to_string().yellow(),
        page.total_items
    );
    for campaign in &page.items {
        println!(
            "  {} {} {} [{}] {} -> {}",
            campaign.id.to_string().magenta(),
            campaign.brand.cyan(),
            campaign.campaign_name,
            campaign.sale_month.dimmed(),
            format_date_dmy(&campaign.start_date),
            format_date_dmy(&campaign.end_date)
        );
    }
    println!(
        "{}",
        format!("Page {}/{}", page.page, page.total_pages.max(1)).dimmed()
    );
    Ok(())
}
