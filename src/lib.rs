//! Brandtracker - campaign tracking with per-field version history
//!
//! Campaigns are grouped into one collection per year. Every edit is diffed
//! against the stored record and the changed fields are appended to the
//! campaign's history, from which an admin can restore earlier values.
//!
//! # Features
//! - **cli**: Command-line interface (default)
//!
//! # Architecture
//! - `storage`: Record store trait, memory and file backends, subscriptions
//! - `history`: Diff engine and history log
//! - `services`: Edit orchestration, rollback, validation
//! - `views`: Search/filter/paging and quarter summaries
//! - `session`: Acting identity, role and year
//! - `interfaces`: User interfaces (CLI)
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging setup

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod errors;
pub mod history;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod session;
pub mod storage;
pub mod system;
pub mod utils;
pub mod views;
