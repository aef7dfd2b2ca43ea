//! Recent-file history for loglens
//!
//! This crate persists the list of previously opened files and groups it
//! into human-relative date buckets for display.

mod error;
mod group;
mod store;

pub use error::HistoryError;
pub use group::{HistoryGroup, format_file_size, group_by_day};
pub use store::{HISTORY_LIMIT, HistoryStore};

// Re-export types used in our public API
pub use loglens_types::HistoryRecord;
