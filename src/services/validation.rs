//! Required-field and date-range checks for campaign writes

use chrono::NaiveDate;

use crate::errors::{BrandtrackerError, Result};
use crate::storage::{Campaign, CampaignField, CampaignFields};
use crate::utils::parse_iso_date;

fn parse_date_field(field: CampaignField, value: &str) -> Result<NaiveDate> {
    parse_iso_date(value).map_err(|_| {
        BrandtrackerError::validation(format!(
            "{} must be a YYYY-MM-DD date, got '{}'",
            field, value
        ))
    })
}

fn check_range(start: Option<&str>, end: Option<&str>) -> Result<()> {
    let start = match start.filter(|s| !s.trim().is_empty()) {
        Some(s) => Some(parse_date_field(CampaignField::StartDate, s)?),
        None => None,
    };
    let end = match end.filter(|s| !s.trim().is_empty()) {
        Some(s) => Some(parse_date_field(CampaignField::EndDate, s)?),
        None => None,
    };
    if let (Some(start), Some(end)) = (start, end)
        && end < start
    {
        return Err(BrandtrackerError::validation(format!(
            "endDate {} is earlier than startDate {}",
            end, start
        )));
    }
    Ok(())
}

/// Validate a complete field set, as submitted for a new campaign or a full edit.
///
/// Every required field must be present and non-blank, dates must parse, and
/// the range must not end before it starts.
pub fn validate_required(fields: &CampaignFields) -> Result<()> {
    let missing: Vec<String> = CampaignField::REQUIRED
        .into_iter()
        .filter(|f| fields.get(*f).is_none_or(|v| v.trim().is_empty()))
        .map(|f| f.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(BrandtrackerError::validation(format!(
            "Missing required field(s): {}",
            missing.join(", ")
        )));
    }
    validate_values(fields)
}

/// Validate only what an edit carries.
///
/// Required fields that are present must not be blank; dates that are present
/// must parse and, when both are given, form a valid range.
pub fn validate_values(fields: &CampaignFields) -> Result<()> {
    for (field, value) in fields.iter() {
        if field.is_required() && value.trim().is_empty() {
            return Err(BrandtrackerError::validation(format!(
                "{} cannot be empty",
                field
            )));
        }
    }
    check_range(
        fields.get(CampaignField::StartDate),
        fields.get(CampaignField::EndDate),
    )
}

/// Validate the record an edit would produce
pub fn validate_campaign(campaign: &Campaign) -> Result<()> {
    validate_required(&campaign.fields())
}
