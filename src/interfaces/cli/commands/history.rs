//! History and restore commands

use chrono::{DateTime, SecondsFormat, Utc};
use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::runtime::lifetime::StartupContext;
use crate::storage::CampaignId;

/// Parse an entry timestamp as printed by `history`
pub fn parse_entry_timestamp(input: &str) -> Result<DateTime<Utc>, CliError> {
    DateTime::parse_from_rfc3339(input.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CliError::ParseError(format!("Invalid timestamp '{}': {}", input, e)))
}

pub async fn show_history(ctx: &StartupContext, id: String) -> Result<(), CliError> {
    let id = CampaignId::new(id);
    let entries = ctx.campaigns.history(&ctx.session, &id).await?;

    if entries.is_empty() {
        println!(
            "{} Campaign {} has no edit history",
            "ℹ".bold().blue(),
            id.to_string().cyan()
        );
        return Ok(());
    }

    println!(
        "{} {} ({} entries)",
        "History of".bold().green(),
        id.to_string().cyan(),
        entries.len()
    );
    for entry in &entries {
        println!(
            "  {} by {}",
            entry
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Micros, true)
                .yellow(),
            entry.editor.blue()
        );
        for (field, change) in &entry.changes {
            println!("    {} {}", format!("{}:", field.label()).dimmed(), change);
        }
    }
    Ok(())
}

pub async fn restore_version(
    ctx: &StartupContext,
    id: String,
    timestamp: String,
) -> Result<(), CliError> {
    let target = parse_entry_timestamp(&timestamp)?;
    let id = CampaignId::new(id);
    let outcome = ctx.rollback.restore(&ctx.session, &id, target).await?;

    println!(
        "{} Restored campaign {} to before {}",
        "✓".bold().green(),
        id.to_string().cyan(),
        outcome
            .entry
            .timestamp
            .to_rfc3339_opts(SecondsFormat::Micros, true)
            .yellow()
    );
    for (field, value) in outcome.restored.iter() {
        println!("  {} {}", format!("{}:", field.label()).dimmed(), value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entry_timestamp_normalizes_offset() {
        let ts = parse_entry_timestamp("2024-03-01T10:00:00.000123+02:00").unwrap();
        assert_eq!(
            ts.to_rfc3339_opts(SecondsFormat::Micros, true),
            "2024-03-01T08:00:00.000123Z"
        );
    }

    #[test]
    fn test_parse_entry_timestamp_rejects_garbage() {
        assert!(matches!(
            parse_entry_timestamp("yesterday"),
            Err(CliError::ParseError(_))
        ));
    }
}
