//! Append-only edit history, embedded in each campaign record

use std::sync::Arc;

use tracing::debug;

use crate::errors::{BrandtrackerError, Result};
use crate::storage::{ChangeEntry, CampaignId, CollectionKey, RecordStore};

/// Read/append access to a record's edit history.
///
/// Entries are never removed or rewritten.
#[derive(Clone)]
pub struct HistoryLog {
    store: Arc<dyn RecordStore>,
}

impl HistoryLog {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn append(
        &self,
        collection: &CollectionKey,
        id: &CampaignId,
        entry: ChangeEntry,
    ) -> Result<()> {
        debug!(
            "HistoryLog: appending {} change(s) by '{}' to {}",
            entry.changes.len(),
            entry.editor,
            id
        );
        self.store.append_to_history(collection, id, entry).await
    }

    /// Entries in store order (not necessarily sorted)
    pub async fn read(&self, collection: &CollectionKey, id: &CampaignId) -> Result<Vec<ChangeEntry>> {
        self.store
            .get(collection, id)
            .await?
            .map(|campaign| campaign.edit_history)
            .ok_or_else(|| {
                BrandtrackerError::not_found(format!(
                    "Campaign '{}' not found in {}",
                    id, collection
                ))
            })
    }

    /// Entries sorted newest first, for display
    pub async fn read_newest_first(
        &self,
        collection: &CollectionKey,
        id: &CampaignId,
    ) -> Result<Vec<ChangeEntry>> {
        let mut entries = self.read(collection, id).await?;
        sort_newest_first(&mut entries);
        Ok(entries)
    }
}

pub fn sort_newest_first(entries: &mut [ChangeEntry]) {
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// Locate an entry by its timestamp identifier
pub fn find_entry<'a>(
    entries: &'a [ChangeEntry],
    timestamp: &chrono::DateTime<chrono::Utc>,
) -> Option<&'a ChangeEntry> {
    entries.iter().find(|e| &e.timestamp == timestamp)
}
