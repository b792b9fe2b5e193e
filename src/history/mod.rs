//! Edit history: field diffs and the per-record audit log

pub mod diff;
pub mod log;

pub use diff::{compute_diff, diff_records};
pub use log::{HistoryLog, find_entry, sort_newest_first};
