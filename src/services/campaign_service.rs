//! Campaign management service
//!
//! Owns the edit path: validation, diffing against the stored record, the
//! history append, and the field write. Also the plain lifecycle operations
//! and the derived list/summary views.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::config::EditConsistency;
use crate::errors::{BrandtrackerError, Result};
use crate::history::{HistoryLog, compute_diff};
use crate::services::validation::{validate_campaign, validate_required, validate_values};
use crate::session::{AuthProvider, SessionContext};
use crate::storage::{
    Campaign, CampaignFields, CampaignId, ChangeEntry, ChangeListener, RecordStore, Subscription,
};
use crate::views::{BrandSummary, CampaignQuery, Page};

/// Result of an edit
#[derive(Debug, Clone)]
pub struct EditOutcome {
    /// The history entry appended for this edit; `None` when nothing changed
    pub entry: Option<ChangeEntry>,
}

impl EditOutcome {
    pub fn changed(&self) -> bool {
        self.entry.is_some()
    }
}

/// Service for campaign operations within one store
pub struct CampaignService {
    store: Arc<dyn RecordStore>,
    history: HistoryLog,
    consistency: EditConsistency,
}

impl CampaignService {
    pub fn new(store: Arc<dyn RecordStore>, consistency: EditConsistency) -> Self {
        Self {
            history: HistoryLog::new(store.clone()),
            store,
            consistency,
        }
    }

    pub fn consistency(&self) -> EditConsistency {
        self.consistency
    }

    fn not_found(session: &SessionContext, id: &CampaignId) -> BrandtrackerError {
        BrandtrackerError::not_found(format!(
            "Campaign '{}' not found in {}",
            id,
            session.collection()
        ))
    }

    // ============ Lifecycle ============

    /// Create a campaign in the session's year
    pub async fn create_campaign(
        &self,
        session: &SessionContext,
        fields: CampaignFields,
    ) -> Result<Campaign> {
        validate_required(&fields)?;

        let campaign = self
            .store
            .create(session.collection(), &fields)
            .await
            .inspect_err(|e| error!("Failed to create campaign: {}", e))?;

        info!(
            "CampaignService: {} created '{}' ({}) in {}",
            session.identity(),
            campaign.campaign_name,
            campaign.id,
            session.collection()
        );
        Ok(campaign)
    }

    pub async fn get_campaign(&self, session: &SessionContext, id: &CampaignId) -> Result<Campaign> {
        self.store
            .get(session.collection(), id)
            .await?
            .ok_or_else(|| Self::not_found(session, id))
    }

    pub async fn delete_campaign(&self, session: &SessionContext, id: &CampaignId) -> Result<()> {
        self.store
            .delete(session.collection(), id)
            .await
            .inspect_err(|e| error!("Failed to delete campaign {}: {}", id, e))?;
        info!(
            "CampaignService: {} deleted {} from {}",
            session.identity(),
            id,
            session.collection()
        );
        Ok(())
    }

    /// Persist the dashboard display order of the session's campaigns
    pub async fn reorder(&self, session: &SessionContext, ids: &[CampaignId]) -> Result<()> {
        self.store
            .set_order(session.collection(), ids)
            .await
            .inspect_err(|e| error!("Failed to reorder {}: {}", session.collection(), e))?;
        info!(
            "CampaignService: {} reordered {} campaign(s) in {}",
            session.identity(),
            ids.len(),
            session.collection()
        );
        Ok(())
    }

    // ============ Edit ============

    /// Apply an edit, recording a history entry when any field changes.
    ///
    /// Fields absent from `edited` keep their stored values. Nothing is
    /// written when validation fails or the campaign does not exist.
    pub async fn apply_edit(
        &self,
        session: &SessionContext,
        id: &CampaignId,
        edited: CampaignFields,
    ) -> Result<EditOutcome> {
        validate_values(&edited)?;

        let current = self.get_campaign(session, id).await?;

        let mut merged = current.clone();
        merged.apply(&edited);
        validate_campaign(&merged)?;

        let changes = compute_diff(&current, &edited);
        let entry = if changes.is_empty() {
            debug!("CampaignService: edit of {} changes nothing", id);
            None
        } else {
            Some(ChangeEntry {
                editor: session.current_identity(),
                timestamp: self.store.server_timestamp(),
                changes,
            })
        };

        let collection = session.collection();
        match self.consistency {
            EditConsistency::Sequential => {
                // 两次独立写入：先追加历史，再更新字段
                if let Some(entry) = &entry {
                    self.history
                        .append(collection, id, entry.clone())
                        .await
                        .inspect_err(|e| error!("History append for {} failed: {}", id, e))?;
                }
                self.store
                    .put_fields(collection, id, &edited)
                    .await
                    .inspect_err(|e| error!("Field update for {} failed: {}", id, e))?;
            }
            EditConsistency::Atomic => {
                self.store
                    .commit_edit(collection, id, entry.clone(), &edited)
                    .await
                    .inspect_err(|e| error!("Atomic edit of {} failed: {}", id, e))?;
            }
        }

        match &entry {
            Some(entry) => info!(
                "CampaignService: {} edited {} ({} field(s) changed)",
                entry.editor,
                id,
                entry.changes.len()
            ),
            None => debug!("CampaignService: {} saved {} unchanged", session.identity(), id),
        }

        Ok(EditOutcome { entry })
    }

    // ============ Views ============

    /// Edit history, newest first
    pub async fn history(&self, session: &SessionContext, id: &CampaignId) -> Result<Vec<ChangeEntry>> {
        self.history.read_newest_first(session.collection(), id).await
    }

    pub async fn list_campaigns(
        &self,
        session: &SessionContext,
        query: &CampaignQuery,
    ) -> Result<Page<Campaign>> {
        let campaigns = self.store.list(session.collection()).await?;
        Ok(query.apply(campaigns))
    }

    /// Brand-by-quarter counts over the campaigns matching `query`'s filters
    pub async fn summary(
        &self,
        session: &SessionContext,
        query: &CampaignQuery,
    ) -> Result<BrandSummary> {
        let campaigns = self.store.list(session.collection()).await?;
        Ok(BrandSummary::from_campaigns(
            campaigns.iter().filter(|c| query.matches(c)),
        ))
    }

    /// Register for snapshots of the session's collection
    pub fn watch(&self, session: &SessionContext, listener: Arc<dyn ChangeListener>) -> Subscription {
        self.store.subscribe(session.collection(), listener)
    }
}
