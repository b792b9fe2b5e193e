pub mod startup;

pub use startup::{StartupContext, apply_session_overrides, prepare_startup};
