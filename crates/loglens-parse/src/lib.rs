//! Log file parsing for loglens
//!
//! This crate turns raw file bytes into an ordered sequence of structured
//! log records, grouping continuation lines and extracting timestamps,
//! levels, and JSON metadata.

mod error;
mod loader;
mod parser;

pub use error::ParseError;
pub use loader::load_file;
pub use parser::LogParser;

// Re-export types used in our public API
pub use loglens_types::{EntrySnapshot, LogLevel, LogRecord};
