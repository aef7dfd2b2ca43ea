//! Filter and search coordination for loglens
//!
//! This crate holds the loaded record snapshot, sequences the asynchronous
//! narrowing passes (text search, then level restriction), and guarantees
//! that the committed view always reflects the most recently submitted
//! criteria, no matter in which order the passes complete.

mod coordinator;
mod debounce;
mod error;
mod eval;
mod pipeline;
mod store;

pub use coordinator::{FilterCoordinator, ViewUpdate};
pub use debounce::{DEBOUNCE_INTERVAL, QueryDebouncer};
pub use error::EvalError;
pub use eval::{Evaluate, LocalEvaluators};
pub use pipeline::narrow;
pub use store::EntryStore;

// Re-export types used in our public API
pub use loglens_types::{
    ArcRecord, EntrySnapshot, FilterCriteria, FilteredView, LogLevel, LogStats,
};
