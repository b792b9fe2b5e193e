//! CSV export of a year's campaigns

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::WriterBuilder;
use serde::Serialize;

use crate::errors::Result;
use crate::storage::Campaign;

/// CSV 行数据结构（仅用于序列化）
#[derive(Debug, Clone, Serialize)]
pub struct CsvCampaignRow {
    pub id: String,
    pub brand: String,
    pub sale_month: String,
    pub campaign_name: String,
    pub campaign_type: String,
    pub page_location: String,
    pub start_date: String,
    pub end_date: String,
    pub engagement_notes: String,
    pub has_image: bool,
    pub edits: usize,
}

impl From<&Campaign> for CsvCampaignRow {
    fn from(c: &Campaign) -> Self {
        Self {
            id: c.id.to_string(),
            brand: c.brand.clone(),
            sale_month: c.sale_month.clone(),
            campaign_name: c.campaign_name.clone(),
            campaign_type: c.campaign_type.clone(),
            page_location: c.page_location.clone(),
            start_date: c.start_date.clone(),
            end_date: c.end_date.clone(),
            engagement_notes: c.engagement_notes.clone(),
            has_image: !c.image_url.is_empty(),
            edits: c.edit_history.len(),
        }
    }
}

/// Write campaigns as CSV (with header) into any writer
pub fn write_csv<W: Write>(writer: W, campaigns: &[Campaign]) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(true).from_writer(writer);
    for campaign in campaigns {
        wtr.serialize(CsvCampaignRow::from(campaign))?;
    }
    wtr.flush()?;
    Ok(())
}

/// 导出活动到 CSV 文件
pub fn export_to_csv<P: AsRef<Path>>(campaigns: &[Campaign], path: P) -> Result<()> {
    let file = File::create(path)?;
    write_csv(BufWriter::new(file), campaigns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{CampaignField, CampaignFields, CampaignId};

    #[test]
    fn test_write_csv() {
        let campaign = Campaign::new(
            CampaignId::from("c1"),
            &CampaignFields::new()
                .with(CampaignField::Brand, "Acme")
                .with(CampaignField::CampaignName, "Spring, Sale")
                .with(CampaignField::StartDate, "2025-02-01"),
        );

        let mut out = Vec::new();
        write_csv(&mut out, &[campaign]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();

        assert!(lines.next().unwrap().starts_with("id,brand,sale_month,campaign_name"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("c1,Acme,,\"Spring, Sale\""));
        assert!(row.ends_with(",false,0"));
    }
}
