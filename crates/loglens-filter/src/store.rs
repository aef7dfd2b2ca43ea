use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;

use loglens_types::{EntrySnapshot, FilterCriteria, LogLevel};

/// Owns the immutable snapshot for the currently loaded file and the user's
/// live filter criteria.
///
/// The snapshot is wholly replaced on each successful load; criteria are
/// mutated by the two narrowing triggers (debounced text input, immediate
/// level toggles) and read as one consistent pair at submission time.
pub struct EntryStore {
    snapshot: RwLock<Option<Arc<EntrySnapshot>>>,
    criteria: RwLock<FilterCriteria>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(None),
            criteria: RwLock::new(FilterCriteria::default()),
        }
    }

    /// Replace the snapshot for a newly loaded file
    pub fn replace_snapshot(&self, snapshot: EntrySnapshot) {
        *self.snapshot.write() = Some(Arc::new(snapshot));
    }

    pub fn snapshot(&self) -> Option<Arc<EntrySnapshot>> {
        self.snapshot.read().clone()
    }

    pub fn criteria(&self) -> FilterCriteria {
        self.criteria.read().clone()
    }

    pub fn set_query(&self, query: String) {
        self.criteria.write().query = query;
    }

    pub fn set_levels(&self, levels: HashSet<LogLevel>) {
        self.criteria.write().levels = levels;
    }
}

impl Default for EntryStore {
    fn default() -> Self {
        Self::new()
    }
}
