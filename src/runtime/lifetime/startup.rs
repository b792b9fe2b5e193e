use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::StaticConfig;
use crate::services::{CampaignService, RollbackService};
use crate::session::{Role, SessionContext};
use crate::storage::{RecordStore, StorageFactory};

/// Everything a front end needs to serve requests
pub struct StartupContext {
    pub store: Arc<dyn RecordStore>,
    pub campaigns: Arc<CampaignService>,
    pub rollback: Arc<RollbackService>,
    pub session: SessionContext,
}

/// 将命令行参数覆盖到会话配置上
pub fn apply_session_overrides(
    config: &mut StaticConfig,
    year: Option<u16>,
    editor: Option<String>,
    role: Option<Role>,
) {
    if let Some(year) = year {
        config.session.year = year;
    }
    if let Some(editor) = editor {
        config.session.editor = editor;
    }
    if let Some(role) = role {
        config.session.role = role;
    }
}

/// 准备启动上下文
/// 包括存储后端、服务实例和会话
pub fn prepare_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let store = StorageFactory::create(&config.store).context("Failed to create storage backend")?;
    info!("Using storage backend: {}", store.backend_name());

    let campaigns = Arc::new(CampaignService::new(
        store.clone(),
        config.store.consistency,
    ));
    let rollback = Arc::new(RollbackService::new(store.clone()));
    let session = SessionContext::from_config(config);

    debug!(
        "Session: {} as {} on {} (edit consistency: {})",
        session.identity(),
        session.role(),
        session.collection(),
        campaigns.consistency().as_ref()
    );
    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext {
        store,
        campaigns,
        rollback,
        session,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_only_given_values() {
        let mut config = StaticConfig::default();
        let editor_before = config.session.editor.clone();
        apply_session_overrides(&mut config, Some(2023), None, Some(Role::Admin));
        assert_eq!(config.session.year, 2023);
        assert_eq!(config.session.editor, editor_before);
        assert_eq!(config.session.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_prepare_startup_with_memory_backend() {
        let mut config = StaticConfig::default();
        config.store.backend = "memory".to_string();
        apply_session_overrides(&mut config, Some(2024), Some("alice".into()), None);

        let ctx = prepare_startup(&config).unwrap();
        assert_eq!(ctx.store.backend_name(), "memory");
        assert_eq!(ctx.session.collection().as_str(), "campaigns_2024");
        assert_eq!(ctx.session.identity(), "alice");
    }

    #[test]
    fn test_prepare_startup_rejects_unknown_backend() {
        let mut config = StaticConfig::default();
        config.store.backend = "redis".to_string();
        assert!(prepare_startup(&config).is_err());
    }
}
