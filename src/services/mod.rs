//! Service layer for business logic
//!
//! Shared by the CLI and by library users; every call takes an explicit
//! session context.

mod campaign_service;
mod rollback_service;
pub mod validation;

pub use campaign_service::*;
pub use rollback_service::*;
