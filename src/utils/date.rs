use chrono::NaiveDate;

use crate::errors::{BrandtrackerError, Result};

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Exactly `DDDD-DD-DD`, so stored dates order correctly as strings
fn has_iso_shape(s: &str) -> bool {
    s.len() == 10
        && s.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Parse a zero-padded ISO `YYYY-MM-DD` date.
///
/// Unpadded forms such as `2025-2-1` and surrounding whitespace are rejected.
pub fn parse_iso_date(s: &str) -> Result<NaiveDate> {
    if !has_iso_shape(s) {
        return Err(BrandtrackerError::date_parse(format!(
            "'{}' is not a YYYY-MM-DD date",
            s
        )));
    }
    Ok(NaiveDate::parse_from_str(s, ISO_DATE_FORMAT)?)
}

/// `YYYY-MM-DD` -> `DD/MM/YYYY`; empty input stays empty.
///
/// Input that does not have three dash-separated parts is returned unchanged.
pub fn format_date_dmy(iso: &str) -> String {
    if iso.is_empty() {
        return String::new();
    }
    let mut parts = iso.splitn(3, '-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(year), Some(month), Some(day)) => format!("{}/{}/{}", day, month, year),
        _ => iso.to_string(),
    }
}
