//! Search, filter, sort and pagination over a year's campaigns

use std::cmp::Ordering;

use serde::Serialize;
use strum::{AsRefStr, Display, EnumString};

use crate::storage::{Campaign, CampaignField};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, AsRefStr, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// One page of results
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based, clamped into `1..=total_pages`
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    /// 0 when nothing matched
    pub total_pages: usize,
}

/// 活动过滤条件
#[derive(Debug, Clone)]
pub struct CampaignQuery {
    /// Case-insensitive substring of brand or campaign name
    pub search: Option<String>,
    /// Exact brand match; empty means any
    pub brands: Vec<String>,
    /// Exact sale month match; empty means any
    pub months: Vec<String>,
    pub sort: Option<(CampaignField, SortDirection)>,
    pub page: usize,
    pub page_size: usize,
}

impl Default for CampaignQuery {
    fn default() -> Self {
        Self::new(10)
    }
}

impl CampaignQuery {
    pub fn new(page_size: usize) -> Self {
        Self {
            search: None,
            brands: Vec::new(),
            months: Vec::new(),
            sort: None,
            page: 1,
            page_size,
        }
    }

    pub fn with_search<T: Into<String>>(mut self, keyword: T) -> Self {
        let keyword = keyword.into();
        // 搜索关键字变化时回到第一页
        self.search = (!keyword.trim().is_empty()).then_some(keyword);
        self.page = 1;
        self
    }

    pub fn with_brands(mut self, brands: Vec<String>) -> Self {
        self.brands = brands;
        self
    }

    pub fn with_months(mut self, months: Vec<String>) -> Self {
        self.months = months;
        self
    }

    pub fn sorted_by(mut self, field: CampaignField, direction: SortDirection) -> Self {
        self.sort = Some((field, direction));
        self
    }

    pub fn at_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn matches(&self, campaign: &Campaign) -> bool {
        if let Some(keyword) = &self.search {
            let kw = keyword.to_lowercase();
            let hit = campaign.brand.to_lowercase().contains(&kw)
                || campaign.campaign_name.to_lowercase().contains(&kw);
            if !hit {
                return false;
            }
        }
        let brand_ok = self.brands.is_empty() || self.brands.contains(&campaign.brand);
        let month_ok = self.months.is_empty() || self.months.contains(&campaign.sale_month);
        brand_ok && month_ok
    }

    fn compare(field: CampaignField, a: &Campaign, b: &Campaign) -> Ordering {
        a.get(field).to_lowercase().cmp(&b.get(field).to_lowercase())
    }

    /// Filter, sort (display order unless a field sort is set), then cut out
    /// the requested page
    pub fn apply(&self, campaigns: Vec<Campaign>) -> Page<Campaign> {
        let mut matched: Vec<Campaign> = campaigns.into_iter().filter(|c| self.matches(c)).collect();

        match self.sort {
            Some((field, direction)) => matched.sort_by(|a, b| match direction {
                SortDirection::Asc => Self::compare(field, a, b),
                SortDirection::Desc => Self::compare(field, b, a),
            }),
            // 未指定排序时按看板顺序
            None => matched.sort_by_key(|c| c.order_index),
        }

        let page_size = self.page_size.max(1);
        let total_items = matched.len();
        let total_pages = total_items.div_ceil(page_size);
        let page = self.page.clamp(1, total_pages.max(1));
        let start = (page - 1) * page_size;

        let items = matched.into_iter().skip(start).take(page_size).collect();

        Page {
            items,
            page,
            page_size,
            total_items,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{CampaignFields, CampaignId};

    fn campaign(id: &str, brand: &str, name: &str, month: &str) -> Campaign {
        Campaign::new(
            CampaignId::from(id),
            &CampaignFields::new()
                .with(CampaignField::Brand, brand)
                .with(CampaignField::CampaignName, name)
                .with(CampaignField::SaleMonth, month),
        )
    }

    fn sample() -> Vec<Campaign> {
        vec![
            campaign("1", "Acme", "Spring Sale", "March"),
            campaign("2", "globex", "Summer Deals", "June"),
            campaign("3", "Initech", "Acme Collab", "March"),
            campaign("4", "Umbrella", "Winter", "December"),
        ]
    }

    fn ids(page: &Page<Campaign>) -> Vec<&str> {
        page.items.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_search_matches_brand_or_name_case_insensitively() {
        let page = CampaignQuery::new(10).with_search("ACME").apply(sample());
        assert_eq!(ids(&page), vec!["1", "3"]);
    }

    #[test]
    fn test_blank_search_matches_everything() {
        let query = CampaignQuery::new(10).with_search("   ");
        assert!(query.search.is_none());
        assert_eq!(query.apply(sample()).total_items, 4);
    }

    #[test]
    fn test_brand_and_month_filters_combine() {
        let page = CampaignQuery::new(10)
            .with_months(vec!["March".into()])
            .with_brands(vec!["Initech".into(), "Umbrella".into()])
            .apply(sample());
        assert_eq!(ids(&page), vec!["3"]);
    }

    #[test]
    fn test_sort_is_case_insensitive_both_ways() {
        let asc = CampaignQuery::new(10)
            .sorted_by(CampaignField::Brand, SortDirection::Asc)
            .apply(sample());
        assert_eq!(ids(&asc), vec!["1", "2", "3", "4"]);

        let desc = CampaignQuery::new(10)
            .sorted_by(CampaignField::Brand, SortDirection::Desc)
            .apply(sample());
        assert_eq!(ids(&desc), vec!["4", "3", "2", "1"]);
    }

    #[test]
    fn test_pagination_clamps_past_last_page() {
        let page = CampaignQuery::new(3).at_page(9).apply(sample());
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.page, 2);
        assert_eq!(ids(&page), vec!["4"]);
    }

    #[test]
    fn test_empty_result_reports_page_one() {
        let page = CampaignQuery::new(3).with_search("nothing").at_page(4).apply(sample());
        assert_eq!(page.total_items, 0);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.page, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_default_order_follows_order_index() {
        let mut campaigns = sample();
        for (campaign, index) in campaigns.iter_mut().zip([2, 0, 3, 1]) {
            campaign.order_index = index;
        }
        let page = CampaignQuery::new(10).apply(campaigns.clone());
        assert_eq!(ids(&page), vec!["2", "4", "1", "3"]);

        let sorted = CampaignQuery::new(10)
            .sorted_by(CampaignField::Brand, SortDirection::Asc)
            .apply(campaigns);
        assert_eq!(ids(&sorted), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_sort_direction_parses() {
        assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Desc);
    }
}
