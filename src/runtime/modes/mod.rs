//! Mode routing
//!
//! Only the command-line mode exists today; it is compiled in with the
//! `cli` feature.

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "cli")]
pub use cli::run_cli;
