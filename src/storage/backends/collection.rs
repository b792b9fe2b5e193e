//! In-memory contents of one collection, shared by the store backends

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::{BrandtrackerError, Result};
use crate::storage::models::{Campaign, CampaignFields, CampaignId, ChangeEntry, CollectionKey};

/// Campaigns of one collection in insertion order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionState {
    campaigns: Vec<Campaign>,
}

impl CollectionState {
    pub fn get(&self, id: &CampaignId) -> Option<Campaign> {
        self.campaigns.iter().find(|c| &c.id == id).cloned()
    }

    pub fn snapshot(&self) -> Vec<Campaign> {
        self.campaigns.clone()
    }

    pub fn len(&self) -> usize {
        self.campaigns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.campaigns.is_empty()
    }

    fn find_mut(&mut self, collection: &CollectionKey, id: &CampaignId) -> Result<&mut Campaign> {
        self.campaigns
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| {
                BrandtrackerError::not_found(format!(
                    "Campaign '{}' not found in {}",
                    id, collection
                ))
            })
    }

    pub fn insert(&mut self, fields: &CampaignFields) -> Campaign {
        let mut id = CampaignId::generate();
        while self.campaigns.iter().any(|c| c.id == id) {
            id = CampaignId::generate();
        }
        let mut campaign = Campaign::new(id, fields);
        // 新活动排在最后
        campaign.order_index = self
            .campaigns
            .iter()
            .map(|c| c.order_index.saturating_add(1))
            .max()
            .unwrap_or(0);
        self.campaigns.push(campaign.clone());
        campaign
    }

    pub fn put_fields(
        &mut self,
        collection: &CollectionKey,
        id: &CampaignId,
        fields: &CampaignFields,
    ) -> Result<()> {
        self.find_mut(collection, id)?.apply(fields);
        Ok(())
    }

    /// Union append; returns false when an equal entry was already present
    pub fn append(
        &mut self,
        collection: &CollectionKey,
        id: &CampaignId,
        entry: ChangeEntry,
    ) -> Result<bool> {
        let campaign = self.find_mut(collection, id)?;
        if campaign.edit_history.contains(&entry) {
            return Ok(false);
        }
        campaign.edit_history.push(entry);
        Ok(true)
    }

    /// Both writes against the same record, after a single lookup
    pub fn commit(
        &mut self,
        collection: &CollectionKey,
        id: &CampaignId,
        entry: Option<ChangeEntry>,
        fields: &CampaignFields,
    ) -> Result<()> {
        let campaign = self.find_mut(collection, id)?;
        if let Some(entry) = entry
            && !campaign.edit_history.contains(&entry)
        {
            campaign.edit_history.push(entry);
        }
        campaign.apply(fields);
        Ok(())
    }

    /// Give each listed campaign its position in `ids` as display order.
    ///
    /// Every id must exist and appear once; otherwise nothing changes.
    pub fn reorder(&mut self, collection: &CollectionKey, ids: &[CampaignId]) -> Result<()> {
        let mut seen = HashSet::with_capacity(ids.len());
        for id in ids {
            if !seen.insert(id) {
                return Err(BrandtrackerError::validation(format!(
                    "Campaign '{}' listed twice in new order",
                    id
                )));
            }
            self.find_mut(collection, id)?;
        }
        for (position, id) in ids.iter().enumerate() {
            self.find_mut(collection, id)?.order_index = u32::try_from(position).unwrap_or(u32::MAX);
        }
        Ok(())
    }

    pub fn remove(&mut self, collection: &CollectionKey, id: &CampaignId) -> Result<Campaign> {
        let pos = self
            .campaigns
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| {
                BrandtrackerError::not_found(format!(
                    "Campaign '{}' not found in {}",
                    id, collection
                ))
            })?;
        Ok(self.campaigns.remove(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::{CampaignField, FieldChange};
    use chrono::Utc;

    fn key() -> CollectionKey {
        CollectionKey::new("campaigns_2025")
    }

    fn entry(editor: &str) -> ChangeEntry {
        ChangeEntry {
            editor: editor.to_string(),
            timestamp: Utc::now(),
            changes: [(CampaignField::Brand, FieldChange::new("A", "B"))]
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn test_append_is_union() {
        let mut state = CollectionState::default();
        let c = state.insert(&CampaignFields::new().with(CampaignField::Brand, "A"));
        let e = entry("ana");

        assert!(state.append(&key(), &c.id, e.clone()).unwrap());
        assert!(!state.append(&key(), &c.id, e).unwrap());
        assert!(state.append(&key(), &c.id, entry("bo")).unwrap());
        assert_eq!(state.get(&c.id).unwrap().edit_history.len(), 2);
    }

    #[test]
    fn test_writes_to_missing_record_fail() {
        let mut state = CollectionState::default();
        let missing = CampaignId::from("nope");
        let err = state
            .put_fields(&key(), &missing, &CampaignFields::new())
            .unwrap_err();
        assert!(matches!(err, BrandtrackerError::NotFound(_)));
        assert!(state.append(&key(), &missing, entry("ana")).is_err());
        assert!(state.remove(&key(), &missing).is_err());
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut state = CollectionState::default();
        let a = state.insert(&CampaignFields::new().with(CampaignField::Brand, "A"));
        let b = state.insert(&CampaignFields::new().with(CampaignField::Brand, "B"));
        let ids: Vec<_> = state.snapshot().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[test]
    fn test_insert_appends_to_display_order() {
        let mut state = CollectionState::default();
        let a = state.insert(&CampaignFields::new());
        let b = state.insert(&CampaignFields::new());
        assert_eq!((a.order_index, b.order_index), (0, 1));
    }

    #[test]
    fn test_reorder_is_all_or_nothing() {
        let mut state = CollectionState::default();
        let a = state.insert(&CampaignFields::new());
        let b = state.insert(&CampaignFields::new());

        state.reorder(&key(), &[b.id.clone(), a.id.clone()]).unwrap();
        assert_eq!(state.get(&b.id).unwrap().order_index, 0);
        assert_eq!(state.get(&a.id).unwrap().order_index, 1);

        let missing = CampaignId::from("missing");
        assert!(matches!(
            state.reorder(&key(), &[a.id.clone(), missing]),
            Err(BrandtrackerError::NotFound(_))
        ));
        assert!(matches!(
            state.reorder(&key(), &[a.id.clone(), a.id.clone()]),
            Err(BrandtrackerError::Validation(_))
        ));
        assert_eq!(state.get(&a.id).unwrap().order_index, 1);
    }
}
