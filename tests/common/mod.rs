#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use brandtracker::config::EditConsistency;
use brandtracker::errors::{BrandtrackerError, Result};
use brandtracker::services::{CampaignService, RollbackService};
use brandtracker::session::{Role, SessionContext};
use brandtracker::storage::{
    Campaign, CampaignField, CampaignFields, CampaignId, ChangeEntry, ChangeListener,
    CollectionKey, MemoryStore, RecordStore, Subscription,
};
use chrono::{DateTime, Utc};

pub const PREFIX: &str = "campaigns_";

pub struct Harness {
    pub store: Arc<dyn RecordStore>,
    pub campaigns: CampaignService,
    pub rollback: RollbackService,
}

impl Harness {
    pub fn memory(consistency: EditConsistency) -> Self {
        Self::with_store(Arc::new(MemoryStore::new()), consistency)
    }

    pub fn with_store(store: Arc<dyn RecordStore>, consistency: EditConsistency) -> Self {
        Self {
            campaigns: CampaignService::new(store.clone(), consistency),
            rollback: RollbackService::new(store.clone()),
            store,
        }
    }

    pub async fn seed(&self, session: &SessionContext) -> Campaign {
        self.campaigns
            .create_campaign(session, sample_fields())
            .await
            .unwrap()
    }

    pub async fn reload(&self, session: &SessionContext, campaign: &Campaign) -> Campaign {
        self.campaigns
            .get_campaign(session, &campaign.id)
            .await
            .unwrap()
    }
}

pub fn admin() -> SessionContext {
    SessionContext::new("alice@example.com", Role::Admin, 2024, PREFIX)
}

pub fn viewer() -> SessionContext {
    SessionContext::new("bob@example.com", Role::Viewer, 2024, PREFIX)
}

pub fn sample_fields() -> CampaignFields {
    CampaignFields::new()
        .with(CampaignField::Brand, "Acme")
        .with(CampaignField::SaleMonth, "March")
        .with(CampaignField::CampaignName, "Spring Sale")
        .with(CampaignField::CampaignType, "Banner")
        .with(CampaignField::PageLocation, "Homepage")
        .with(CampaignField::StartDate, "2024-03-01")
        .with(CampaignField::EndDate, "2024-03-31")
}

/// MemoryStore wrapper whose writes can be switched to fail
#[derive(Default)]
pub struct FailingStore {
    inner: MemoryStore,
    pub fail_append: AtomicBool,
    pub fail_put: AtomicBool,
    pub fail_commit: AtomicBool,
}

impl FailingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn check(flag: &AtomicBool, operation: &str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(BrandtrackerError::store(format!("{} unavailable", operation)));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FailingStore {
    async fn get(&self, collection: &CollectionKey, id: &CampaignId) -> Result<Option<Campaign>> {
        self.inner.get(collection, id).await
    }

    async fn list(&self, collection: &CollectionKey) -> Result<Vec<Campaign>> {
        self.inner.list(collection).await
    }

    async fn create(&self, collection: &CollectionKey, fields: &CampaignFields) -> Result<Campaign> {
        self.inner.create(collection, fields).await
    }

    async fn put_fields(
        &self,
        collection: &CollectionKey,
        id: &CampaignId,
        fields: &CampaignFields,
    ) -> Result<()> {
        Self::check(&self.fail_put, "put_fields")?;
        self.inner.put_fields(collection, id, fields).await
    }

    async fn append_to_history(
        &self,
        collection: &CollectionKey,
        id: &CampaignId,
        entry: ChangeEntry,
    ) -> Result<()> {
        Self::check(&self.fail_append, "append_to_history")?;
        self.inner.append_to_history(collection, id, entry).await
    }

    async fn commit_edit(
        &self,
        collection: &CollectionKey,
        id: &CampaignId,
        entry: Option<ChangeEntry>,
        fields: &CampaignFields,
    ) -> Result<()> {
        Self::check(&self.fail_commit, "commit_edit")?;
        self.inner.commit_edit(collection, id, entry, fields).await
    }

    async fn delete(&self, collection: &CollectionKey, id: &CampaignId) -> Result<()> {
        self.inner.delete(collection, id).await
    }

    async fn set_order(&self, collection: &CollectionKey, ids: &[CampaignId]) -> Result<()> {
        self.inner.set_order(collection, ids).await
    }

    fn server_timestamp(&self) -> DateTime<Utc> {
        self.inner.server_timestamp()
    }

    fn subscribe(
        &self,
        collection: &CollectionKey,
        listener: Arc<dyn ChangeListener>,
    ) -> Subscription {
        self.inner.subscribe(collection, listener)
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}
