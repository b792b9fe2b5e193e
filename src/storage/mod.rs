use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::StoreConfig;
use crate::errors::{BrandtrackerError, Result};

pub mod backends;
pub mod clock;
pub mod models;
pub mod subscription;

pub use backends::{FileStore, MemoryStore};
pub use clock::MonotonicClock;
pub use models::{
    Campaign, CampaignField, CampaignFields, CampaignId, ChangeEntry, ChangeSet, CollectionKey,
    FieldChange,
};
pub use subscription::{ChangeListener, Subscription, SubscriberRegistry};

/// Persistence and change-notification layer for campaigns.
///
/// Every write is scoped to a collection (one per year). Writes that touch an
/// existing record fail with `NotFound` when the record is absent.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(&self, collection: &CollectionKey, id: &CampaignId) -> Result<Option<Campaign>>;

    async fn list(&self, collection: &CollectionKey) -> Result<Vec<Campaign>>;

    /// Insert a new record; the store assigns its identity
    async fn create(&self, collection: &CollectionKey, fields: &CampaignFields)
    -> Result<Campaign>;

    /// Merge-write the given fields, leaving the others untouched
    async fn put_fields(
        &self,
        collection: &CollectionKey,
        id: &CampaignId,
        fields: &CampaignFields,
    ) -> Result<()>;

    /// Union append to the record's edit history.
    ///
    /// An entry equal to one already present is not added twice; entries
    /// appended by other writers are never overwritten.
    async fn append_to_history(
        &self,
        collection: &CollectionKey,
        id: &CampaignId,
        entry: ChangeEntry,
    ) -> Result<()>;

    /// History append and field write applied as one atomic step
    async fn commit_edit(
        &self,
        collection: &CollectionKey,
        id: &CampaignId,
        entry: Option<ChangeEntry>,
        fields: &CampaignFields,
    ) -> Result<()>;

    async fn delete(&self, collection: &CollectionKey, id: &CampaignId) -> Result<()>;

    /// Persist display order: each listed record gets its position in `ids`.
    ///
    /// Fails without writing anything when an id is unknown or repeated.
    async fn set_order(&self, collection: &CollectionKey, ids: &[CampaignId]) -> Result<()>;

    /// Strictly increasing timestamp used to identify history entries
    fn server_timestamp(&self) -> DateTime<Utc>;

    /// Register a listener for the collection's contents.
    ///
    /// The listener gets the current snapshot immediately and a fresh one
    /// after every write to the collection.
    fn subscribe(
        &self,
        collection: &CollectionKey,
        listener: Arc<dyn ChangeListener>,
    ) -> Subscription;

    fn backend_name(&self) -> &'static str;
}

pub struct StorageFactory;

impl StorageFactory {
    pub fn create(config: &StoreConfig) -> Result<Arc<dyn RecordStore>> {
        let store: Arc<dyn RecordStore> = match config.backend.as_str() {
            "memory" => Arc::new(MemoryStore::new()),
            "file" => Arc::new(FileStore::new(&config.data_dir)?),
            other => {
                return Err(BrandtrackerError::config(format!(
                    "Unknown store backend '{}'. Supported: memory, file",
                    other
                )));
            }
        };

        tracing::debug!("Using {} store backend", store.backend_name());
        Ok(store)
    }
}
