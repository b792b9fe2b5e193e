use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::debug;

use super::collection::CollectionState;
use crate::errors::Result;
use crate::storage::{
    Campaign, CampaignFields, CampaignId, ChangeEntry, ChangeListener, CollectionKey,
    MonotonicClock, RecordStore, SubscriberRegistry, Subscription,
};

/// Process-local store; contents are lost on exit
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<CollectionKey, CollectionState>>,
    clock: MonotonicClock,
    subscribers: SubscriberRegistry,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a mutation under the write lock, then notify with the new snapshot
    fn mutate<R>(
        &self,
        collection: &CollectionKey,
        f: impl FnOnce(&mut CollectionState) -> Result<R>,
    ) -> Result<R> {
        let (result, snapshot) = {
            let mut collections = self.collections.write();
            let state = collections.entry(collection.clone()).or_default();
            let result = f(state)?;
            (result, state.snapshot())
        };
        self.subscribers.notify(collection, &snapshot);
        Ok(result)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get(&self, collection: &CollectionKey, id: &CampaignId) -> Result<Option<Campaign>> {
        Ok(self
            .collections
            .read()
            .get(collection)
            .and_then(|state| state.get(id)))
    }

    async fn list(&self, collection: &CollectionKey) -> Result<Vec<Campaign>> {
        Ok(self
            .collections
            .read()
            .get(collection)
            .map(CollectionState::snapshot)
            .unwrap_or_default())
    }

    async fn create(
        &self,
        collection: &CollectionKey,
        fields: &CampaignFields,
    ) -> Result<Campaign> {
        let campaign = self.mutate(collection, |state| Ok(state.insert(fields)))?;
        debug!("MemoryStore: created {} in {}", campaign.id, collection);
        Ok(campaign)
    }

    async fn put_fields(
        &self,
        collection: &CollectionKey,
        id: &CampaignId,
        fields: &CampaignFields,
    ) -> Result<()> {
        self.mutate(collection, |state| state.put_fields(collection, id, fields))
    }

    async fn append_to_history(
        &self,
        collection: &CollectionKey,
        id: &CampaignId,
        entry: ChangeEntry,
    ) -> Result<()> {
        let added = self.mutate(collection, |state| state.append(collection, id, entry))?;
        if !added {
            debug!("MemoryStore: history entry for {} already present", id);
        }
        Ok(())
    }

    async fn commit_edit(
        &self,
        collection: &CollectionKey,
        id: &CampaignId,
        entry: Option<ChangeEntry>,
        fields: &CampaignFields,
    ) -> Result<()> {
        self.mutate(collection, |state| state.commit(collection, id, entry, fields))
    }

    async fn delete(&self, collection: &CollectionKey, id: &CampaignId) -> Result<()> {
        self.mutate(collection, |state| state.remove(collection, id).map(|_| ()))
    }

    async fn set_order(&self, collection: &CollectionKey, ids: &[CampaignId]) -> Result<()> {
        self.mutate(collection, |state| state.reorder(collection, ids))?;
        debug!("MemoryStore: reordered {} campaign(s) in {}", ids.len(), collection);
        Ok(())
    }

    fn server_timestamp(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn subscribe(
        &self,
        collection: &CollectionKey,
        listener: Arc<dyn ChangeListener>,
    ) -> Subscription {
        // 先注册，再取快照，避免漏掉中间的写入
        let subscription = self.subscribers.register(collection, listener.clone());
        let snapshot = self
            .collections
            .read()
            .get(collection)
            .map(CollectionState::snapshot)
            .unwrap_or_default();
        listener.on_change(collection, &snapshot);
        subscription
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
