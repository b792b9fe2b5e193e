//! Restore a campaign's fields to the values before a given history entry

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::errors::{BrandtrackerError, Result};
use crate::history::{HistoryLog, find_entry};
use crate::session::{AuthProvider, SessionContext};
use crate::storage::{CampaignFields, CampaignId, ChangeEntry, RecordStore};

/// Result of a restore
#[derive(Debug, Clone)]
pub struct RestoreOutcome {
    /// The entry whose pre-change values were reapplied
    pub entry: ChangeEntry,
    /// Field values that were written back
    pub restored: CampaignFields,
}

pub struct RollbackService {
    store: Arc<dyn RecordStore>,
    history: HistoryLog,
}

impl RollbackService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            history: HistoryLog::new(store.clone()),
            store,
        }
    }

    /// Reapply the `old` side of the entry identified by `target`.
    ///
    /// Only admins may restore. The restore itself is not added to the
    /// campaign's history.
    pub async fn restore(
        &self,
        session: &SessionContext,
        id: &CampaignId,
        target: DateTime<Utc>,
    ) -> Result<RestoreOutcome> {
        if !session.current_role().is_privileged() {
            warn!(
                "RollbackService: {} ({}) tried to restore {}",
                session.identity(),
                session.role(),
                id
            );
            return Err(BrandtrackerError::permission(format!(
                "Role '{}' cannot restore versions; admin required",
                session.role()
            )));
        }

        let collection = session.collection();
        let entries = self.history.read(collection, id).await?;
        if entries.is_empty() {
            return Err(BrandtrackerError::not_found(format!(
                "Campaign '{}' has no edit history",
                id
            )));
        }

        let entry = find_entry(&entries, &target).cloned().ok_or_else(|| {
            BrandtrackerError::not_found(format!(
                "No history entry at {} for campaign '{}'",
                target.to_rfc3339(),
                id
            ))
        })?;

        let restored = entry.old_values();
        self.store
            .put_fields(collection, id, &restored)
            .await
            .inspect_err(|e| error!("Restore of {} failed: {}", id, e))?;

        info!(
            "RollbackService: {} restored {} field(s) of {} to before {}",
            session.identity(),
            restored.len(),
            id,
            entry.timestamp.to_rfc3339()
        );

        Ok(RestoreOutcome { entry, restored })
    }
}
