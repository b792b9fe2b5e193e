//! Who is acting, with which role, on which year
//!
//! Every service call takes a [`SessionContext`] instead of reading ambient
//! state. Authentication itself happens elsewhere; the session only carries
//! its result.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::config::StaticConfig;
use crate::storage::CollectionKey;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    AsRefStr,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    /// May restore history entries
    Admin,
    #[default]
    Viewer,
}

impl Role {
    pub fn is_privileged(self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// Source of the current actor's role and identity
pub trait AuthProvider: Send + Sync {
    fn current_role(&self) -> Role;
    fn current_identity(&self) -> String;
}

/// Explicit per-call context: actor, role, and active collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    identity: String,
    role: Role,
    year: u16,
    collection: CollectionKey,
}

impl SessionContext {
    pub fn new<T: Into<String>>(identity: T, role: Role, year: u16, prefix: &str) -> Self {
        Self {
            identity: identity.into(),
            role,
            year,
            collection: CollectionKey::for_year(prefix, year),
        }
    }

    /// Session defaults from the `[session]` and `[store]` config sections
    pub fn from_config(config: &StaticConfig) -> Self {
        Self::new(
            config.session.editor.clone(),
            config.session.role,
            config.session.year,
            &config.store.collection_prefix,
        )
    }

    /// Same actor, another year
    pub fn for_year(&self, year: u16, prefix: &str) -> Self {
        Self::new(self.identity.clone(), self.role, year, prefix)
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn collection(&self) -> &CollectionKey {
        &self.collection
    }
}

impl AuthProvider for SessionContext {
    fn current_role(&self) -> Role {
        self.role
    }

    fn current_identity(&self) -> String {
        self.identity.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_collection_follows_year() {
        let session = SessionContext::new("ana@example.com", Role::Admin, 2024, "campaigns_");
        assert_eq!(session.collection().as_str(), "campaigns_2024");

        let next = session.for_year(2025, "campaigns_");
        assert_eq!(next.collection().as_str(), "campaigns_2025");
        assert_eq!(next.identity(), "ana@example.com");
        assert_eq!(next.current_role(), Role::Admin);
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("viewer".parse::<Role>().unwrap(), Role::Viewer);
        assert!("owner".parse::<Role>().is_err());
        assert!(Role::Admin.is_privileged());
        assert!(!Role::Viewer.is_privileged());
    }
}
