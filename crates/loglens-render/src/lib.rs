//! View rendering and match highlighting for loglens
//!
//! This crate turns a committed filtered view into a bounded sequence of
//! safely-escaped display units, with case-insensitive highlighting of the
//! current query.

mod highlight;
mod render;

pub use highlight::{HIGHLIGHT_CLOSE, HIGHLIGHT_OPEN, escape_html, highlight_matches};
pub use render::{DisplayEntry, DisplayUnit, MAX_DISPLAY, format_timestamp, render_view};

// Re-export types used in our public API
pub use loglens_types::{FilteredView, LogLevel};
