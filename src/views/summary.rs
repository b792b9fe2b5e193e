//! Brand appearances per quarter

use std::collections::BTreeMap;

use serde::Serialize;
use strum::{Display, EnumIter};

use crate::storage::Campaign;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, EnumIter, Display)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

/// Map an English month name to its quarter
pub fn quarter_from_month(month: &str) -> Option<Quarter> {
    match month.trim().to_lowercase().as_str() {
        "january" | "february" | "march" => Some(Quarter::Q1),
        "april" | "may" | "june" => Some(Quarter::Q2),
        "july" | "august" | "september" => Some(Quarter::Q3),
        "october" | "november" | "december" => Some(Quarter::Q4),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QuarterCounts {
    pub q1: usize,
    pub q2: usize,
    pub q3: usize,
    pub q4: usize,
}

impl QuarterCounts {
    pub fn get(&self, quarter: Quarter) -> usize {
        match quarter {
            Quarter::Q1 => self.q1,
            Quarter::Q2 => self.q2,
            Quarter::Q3 => self.q3,
            Quarter::Q4 => self.q4,
        }
    }

    fn increment(&mut self, quarter: Quarter) {
        match quarter {
            Quarter::Q1 => self.q1 += 1,
            Quarter::Q2 => self.q2 += 1,
            Quarter::Q3 => self.q3 += 1,
            Quarter::Q4 => self.q4 += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.q1 + self.q2 + self.q3 + self.q4
    }
}

/// Per-brand quarter counts, keyed by brand name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BrandSummary {
    rows: BTreeMap<String, QuarterCounts>,
}

impl BrandSummary {
    pub const UNKNOWN_BRAND: &'static str = "Unknown";

    /// A campaign whose month has no quarter still lists its brand with zeros
    pub fn from_campaigns<'a, I>(campaigns: I) -> Self
    where
        I: IntoIterator<Item = &'a Campaign>,
    {
        let mut rows: BTreeMap<String, QuarterCounts> = BTreeMap::new();
        for campaign in campaigns {
            let brand = if campaign.brand.is_empty() {
                Self::UNKNOWN_BRAND.to_string()
            } else {
                campaign.brand.clone()
            };
            let counts = rows.entry(brand).or_default();
            if let Some(quarter) = quarter_from_month(&campaign.sale_month) {
                counts.increment(quarter);
            }
        }
        Self { rows }
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &QuarterCounts)> {
        self.rows.iter().map(|(b, c)| (b.as_str(), c))
    }

    pub fn get(&self, brand: &str) -> Option<&QuarterCounts> {
        self.rows.get(brand)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{CampaignField, CampaignFields, CampaignId};

    fn campaign(brand: &str, month: &str) -> Campaign {
        Campaign::new(
            CampaignId::generate(),
            &CampaignFields::new()
                .with(CampaignField::Brand, brand)
                .with(CampaignField::SaleMonth, month),
        )
    }

    #[test]
    fn test_quarter_from_month() {
        assert_eq!(quarter_from_month("January"), Some(Quarter::Q1));
        assert_eq!(quarter_from_month("MAY"), Some(Quarter::Q2));
        assert_eq!(quarter_from_month("september"), Some(Quarter::Q3));
        assert_eq!(quarter_from_month("December"), Some(Quarter::Q4));
        assert_eq!(quarter_from_month("Dec"), None);
        assert_eq!(quarter_from_month(""), None);
    }

    #[test]
    fn test_brand_summary_counts() {
        let campaigns = vec![
            campaign("Acme", "January"),
            campaign("Acme", "March"),
            campaign("Acme", "July"),
            campaign("", "April"),
            campaign("Globex", "sometime"),
        ];
        let summary = BrandSummary::from_campaigns(&campaigns);

        let acme = summary.get("Acme").unwrap();
        assert_eq!((acme.q1, acme.q3, acme.total()), (2, 1, 3));
        assert_eq!(summary.get("Unknown").unwrap().q2, 1);
        assert_eq!(summary.get("Globex").unwrap().total(), 0);
        assert_eq!(summary.len(), 3);
    }

    #[test]
    fn test_empty_summary() {
        assert!(BrandSummary::from_campaigns(&Vec::<Campaign>::new()).is_empty());
    }
}
