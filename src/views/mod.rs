//! Derived, read-only views over a collection snapshot

pub mod query;
pub mod summary;

pub use query::{CampaignQuery, Page, SortDirection};
pub use summary::{BrandSummary, Quarter, QuarterCounts, quarter_from_month};
