use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Business attributes of a campaign.
///
/// Identity and edit history are deliberately not listed here, so they can
/// never show up in a diff or a field write.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    AsRefStr,
    Display,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum CampaignField {
    Brand,
    SaleMonth,
    CampaignName,
    CampaignType,
    PageLocation,
    StartDate,
    EndDate,
    EngagementNotes,
    ImageUrl,
}

impl CampaignField {
    /// Fields that must be present and non-empty on every saved campaign
    pub const REQUIRED: [CampaignField; 4] = [
        CampaignField::Brand,
        CampaignField::CampaignName,
        CampaignField::StartDate,
        CampaignField::EndDate,
    ];

    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }

    pub fn is_date(self) -> bool {
        matches!(self, CampaignField::StartDate | CampaignField::EndDate)
    }

    /// Column label used by list output and CSV headers
    pub fn label(self) -> &'static str {
        match self {
            CampaignField::Brand => "Brand",
            CampaignField::SaleMonth => "Sale Month",
            CampaignField::CampaignName => "Campaign Name",
            CampaignField::CampaignType => "Campaign Type",
            CampaignField::PageLocation => "Page Location",
            CampaignField::StartDate => "Start Date",
            CampaignField::EndDate => "End Date",
            CampaignField::EngagementNotes => "Engagement Notes",
            CampaignField::ImageUrl => "Image",
        }
    }
}

/// Store-assigned campaign identity
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignId(String);

impl CampaignId {
    pub fn new<T: Into<String>>(id: T) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CampaignId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CampaignId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Name of the per-year collection, e.g. `campaigns_2025`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionKey(String);

impl CollectionKey {
    pub fn new<T: Into<String>>(key: T) -> Self {
        Self(key.into())
    }

    pub fn for_year(prefix: &str, year: u16) -> Self {
        Self(format!("{}{}", prefix, year))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A partial set of business field values.
///
/// Used for edit requests and merge writes: a field missing from the set
/// means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignFields(BTreeMap<CampaignField, String>);

impl CampaignFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with<T: Into<String>>(mut self, field: CampaignField, value: T) -> Self {
        self.0.insert(field, value.into());
        self
    }

    pub fn set<T: Into<String>>(&mut self, field: CampaignField, value: T) {
        self.0.insert(field, value.into());
    }

    pub fn get(&self, field: CampaignField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: CampaignField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn remove(&mut self, field: CampaignField) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CampaignField, &str)> {
        self.0.iter().map(|(f, v)| (*f, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(CampaignField, String)> for CampaignFields {
    fn from_iter<I: IntoIterator<Item = (CampaignField, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One field's value before and after an edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FieldChangeRepr")]
pub struct FieldChange {
    pub old: String,
    pub new: String,
}

impl FieldChange {
    pub const ARROW: &'static str = " → ";

    pub fn new<O: Into<String>, N: Into<String>>(old: O, new: N) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
        }
    }

    /// Parse the legacy `"old → new"` encoding.
    ///
    /// The split is made at the first arrow. The legacy format has no escaping,
    /// so a pair whose old value itself contained `" → "` cannot be recovered:
    /// the excess text ends up on the new side and a restore from such an entry
    /// writes back only the text before the first arrow.
    pub fn parse_encoded(encoded: &str) -> Option<Self> {
        encoded
            .split_once(Self::ARROW)
            .map(|(old, new)| Self::new(old, new))
    }
}

impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.old, Self::ARROW, self.new)
    }
}

/// Older history entries stored each change as a single `"old → new"` string
#[derive(Deserialize)]
#[serde(untagged)]
enum FieldChangeRepr {
    Pair { old: String, new: String },
    Encoded(String),
}

impl TryFrom<FieldChangeRepr> for FieldChange {
    type Error = String;

    fn try_from(repr: FieldChangeRepr) -> Result<Self, Self::Error> {
        match repr {
            FieldChangeRepr::Pair { old, new } => Ok(FieldChange { old, new }),
            FieldChangeRepr::Encoded(s) => FieldChange::parse_encoded(&s)
                .ok_or_else(|| format!("malformed field change '{}', expected 'old → new'", s)),
        }
    }
}

/// Field-level delta between two versions of a campaign
pub type ChangeSet = BTreeMap<CampaignField, FieldChange>;

/// One audit-log item. Immutable once appended; `timestamp` doubles as its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    pub editor: String,
    pub timestamp: DateTime<Utc>,
    pub changes: ChangeSet,
}

impl ChangeEntry {
    /// The pre-change value of every field this entry touched
    pub fn old_values(&self) -> CampaignFields {
        self.changes
            .iter()
            .map(|(field, change)| (*field, change.old.clone()))
            .collect()
    }
}

/// A tracked campaign
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: CampaignId,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub sale_month: String,
    #[serde(default)]
    pub campaign_name: String,
    #[serde(default)]
    pub campaign_type: String,
    #[serde(default)]
    pub page_location: String,
    /// ISO `YYYY-MM-DD`
    #[serde(default)]
    pub start_date: String,
    /// ISO `YYYY-MM-DD`
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub engagement_notes: String,
    #[serde(default)]
    pub image_url: String,
    /// Dashboard display position; not a business field, never diffed
    #[serde(default)]
    pub order_index: u32,
    #[serde(default)]
    pub edit_history: Vec<ChangeEntry>,
}

impl Campaign {
    pub fn new(id: CampaignId, fields: &CampaignFields) -> Self {
        let mut campaign = Campaign {
            id,
            ..Default::default()
        };
        campaign.apply(fields);
        campaign
    }

    pub fn get(&self, field: CampaignField) -> &str {
        match field {
            CampaignField::Brand => &self.brand,
            CampaignField::SaleMonth => &self.sale_month,
            CampaignField::CampaignName => &self.campaign_name,
            CampaignField::CampaignType => &self.campaign_type,
            CampaignField::PageLocation => &self.page_location,
            CampaignField::StartDate => &self.start_date,
            CampaignField::EndDate => &self.end_date,
            CampaignField::EngagementNotes => &self.engagement_notes,
            CampaignField::ImageUrl => &self.image_url,
        }
    }

    fn slot_mut(&mut self, field: CampaignField) -> &mut String {
        match field {
            CampaignField::Brand => &mut self.brand,
            CampaignField::SaleMonth => &mut self.sale_month,
            CampaignField::CampaignName => &mut self.campaign_name,
            CampaignField::CampaignType => &mut self.campaign_type,
            CampaignField::PageLocation => &mut self.page_location,
            CampaignField::StartDate => &mut self.start_date,
            CampaignField::EndDate => &mut self.end_date,
            CampaignField::EngagementNotes => &mut self.engagement_notes,
            CampaignField::ImageUrl => &mut self.image_url,
        }
    }

    pub fn set<T: Into<String>>(&mut self, field: CampaignField, value: T) {
        *self.slot_mut(field) = value.into();
    }

    /// Merge-write: only the fields present in `fields` are replaced
    pub fn apply(&mut self, fields: &CampaignFields) {
        for (field, value) in fields.iter() {
            self.set(field, value);
        }
    }

    /// Every business field as a full candidate set
    pub fn fields(&self) -> CampaignFields {
        CampaignField::iter()
            .map(|f| (f, self.get(f).to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_are_camel_case() {
        assert_eq!(CampaignField::SaleMonth.as_ref(), "saleMonth");
        assert_eq!(CampaignField::ImageUrl.to_string(), "imageUrl");
        assert_eq!(
            "campaignname".parse::<CampaignField>().unwrap(),
            CampaignField::CampaignName
        );
        assert!("id".parse::<CampaignField>().is_err());
        assert!("editHistory".parse::<CampaignField>().is_err());
    }

    #[test]
    fn test_apply_is_merge_write() {
        let mut campaign = Campaign::new(
            CampaignId::from("c1"),
            &CampaignFields::new()
                .with(CampaignField::Brand, "Acme")
                .with(CampaignField::SaleMonth, "March"),
        );
        campaign.apply(&CampaignFields::new().with(CampaignField::Brand, "Globex"));
        assert_eq!(campaign.brand, "Globex");
        assert_eq!(campaign.sale_month, "March");
        assert_eq!(campaign.id.as_str(), "c1");
    }

    #[test]
    fn test_fields_covers_every_business_attribute() {
        let campaign = Campaign::default();
        assert_eq!(campaign.fields().len(), CampaignField::iter().count());
    }

    #[test]
    fn test_field_change_display() {
        assert_eq!(FieldChange::new("A", "B").to_string(), "A → B");
    }

    #[test]
    fn test_change_entry_reads_both_encodings() {
        let json = r#"{
            "editor": "ana@example.com",
            "timestamp": "2025-03-01T10:00:00Z",
            "changes": {
                "brand": {"old": "X", "new": "Y"},
                "saleMonth": "March → April"
            }
        }"#;
        let entry: ChangeEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.changes[&CampaignField::Brand], FieldChange::new("X", "Y"));
        assert_eq!(
            entry.changes[&CampaignField::SaleMonth],
            FieldChange::new("March", "April")
        );
    }

    #[test]
    fn test_malformed_legacy_change_is_rejected() {
        let json = r#"{"editor": "x", "timestamp": "2025-03-01T10:00:00Z",
                       "changes": {"brand": "no arrow here"}}"#;
        assert!(serde_json::from_str::<ChangeEntry>(json).is_err());
    }

    #[test]
    fn test_legacy_change_splits_at_first_arrow() {
        let change = FieldChange::parse_encoded("A → B → C").unwrap();
        assert_eq!(change, FieldChange::new("A", "B → C"));
    }

    #[test]
    fn test_order_index_is_not_a_business_field() {
        let mut campaign = Campaign::new(CampaignId::from("c1"), &CampaignFields::new());
        let before = campaign.fields();
        campaign.order_index = 7;
        assert_eq!(campaign.fields(), before);
        assert!("orderIndex".parse::<CampaignField>().is_err());
    }

    #[test]
    fn test_campaign_json_uses_original_attribute_names() {
        let campaign = Campaign::new(
            CampaignId::from("c1"),
            &CampaignFields::new().with(CampaignField::CampaignName, "Spring Sale"),
        );
        let value = serde_json::to_value(&campaign).unwrap();
        assert_eq!(value["campaignName"], "Spring Sale");
        assert!(value["editHistory"].as_array().unwrap().is_empty());
        assert_eq!(value["orderIndex"], 0);
    }

    #[test]
    fn test_collection_key_for_year() {
        assert_eq!(
            CollectionKey::for_year("campaigns_", 2025).as_str(),
            "campaigns_2025"
        );
    }
}
