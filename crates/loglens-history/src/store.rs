use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::debug;

use loglens_types::HistoryRecord;

use crate::error::HistoryError;

/// Number of files remembered
pub const HISTORY_LIMIT: usize = 20;

/// Persists the recent-file list as JSON.
///
/// The current format is an array of [`HistoryRecord`]; legacy files that
/// hold a plain array of path strings are migrated on load, deriving the
/// file name from the path, the size from a stat, and an unknown access
/// time.
pub struct HistoryStore {
    file: PathBuf,
    limit: usize,
}

impl HistoryStore {
    /// Store at the platform default location
    pub fn open_default() -> Result<Self, HistoryError> {
        let dir = dirs::data_dir()
            .ok_or(HistoryError::NoDataDir)?
            .join("loglens");
        Ok(Self::at(dir.join("history.json")))
    }

    /// Store at an explicit file path
    pub fn at(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            limit: HISTORY_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Load the history in recency order. A missing file is an empty
    /// history.
    pub fn load(&self) -> Result<Vec<HistoryRecord>, HistoryError> {
        if !self.file.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.file).map_err(|source| HistoryError::Io {
            path: self.file.display().to_string(),
            source,
        })?;

        if let Ok(records) = serde_json::from_str::<Vec<HistoryRecord>>(&content) {
            return Ok(records);
        }

        if let Ok(paths) = serde_json::from_str::<Vec<String>>(&content) {
            debug!(path = %self.file.display(), "migrating legacy history format");
            return Ok(paths.into_iter().map(migrate_legacy).collect());
        }

        Err(HistoryError::Malformed {
            path: self.file.display().to_string(),
        })
    }

    /// Record an access: drop any earlier record for the same path, insert
    /// at the front, truncate to the capacity, write back.
    ///
    /// An unreadable or malformed existing file starts a fresh history
    /// rather than failing the write.
    pub fn record(&self, path: &Path) -> Result<(), HistoryError> {
        let mut history = self.load().unwrap_or_default();

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        let size_bytes = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        let path_str = path.display().to_string();

        history.retain(|record| record.path != path_str);
        history.insert(
            0,
            HistoryRecord {
                path: path_str,
                file_name,
                accessed_at: Some(Local::now()),
                size_bytes,
            },
        );
        history.truncate(self.limit);

        if let Some(parent) = self.file.parent() {
            fs::create_dir_all(parent).map_err(|source| HistoryError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(&history)?;
        fs::write(&self.file, json).map_err(|source| HistoryError::Io {
            path: self.file.display().to_string(),
            source,
        })
    }
}

fn migrate_legacy(path: String) -> HistoryRecord {
    let file_name = Path::new(&path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();
    let size_bytes = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

    HistoryRecord {
        path,
        file_name,
        accessed_at: None,
        size_bytes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TempStore {
        dir: PathBuf,
        store: HistoryStore,
    }

    impl TempStore {
        fn new(name: &str) -> Self {
            let dir = std::env::temp_dir().join(format!(
                "loglens-history-{}-{name}",
                std::process::id()
            ));
            let _ = fs::remove_dir_all(&dir);
            let store = HistoryStore::at(dir.join("history.json"));
            Self { dir, store }
        }
    }

    impl Drop for TempStore {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.dir);
        }
    }

    #[test]
    fn test_missing_file_is_empty_history() {
        let temp = TempStore::new("missing");
        assert!(temp.store.load().unwrap().is_empty());
    }

    #[test]
    fn test_record_and_load_round_trip() {
        let temp = TempStore::new("round-trip");
        temp.store.record(Path::new("/var/log/a.log")).unwrap();
        temp.store.record(Path::new("/var/log/b.log")).unwrap();

        let history = temp.store.load().unwrap();
        assert_eq!(history.len(), 2);
        // most recent first
        assert_eq!(history[0].path, "/var/log/b.log");
        assert_eq!(history[0].file_name, "b.log");
        assert!(history[0].accessed_at.is_some());
    }

    #[test]
    fn test_duplicate_paths_move_to_front() {
        let temp = TempStore::new("dedupe");
        temp.store.record(Path::new("/var/log/a.log")).unwrap();
        temp.store.record(Path::new("/var/log/b.log")).unwrap();
        temp.store.record(Path::new("/var/log/a.log")).unwrap();

        let history = temp.store.load().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].path, "/var/log/a.log");
        assert_eq!(history[1].path, "/var/log/b.log");
    }

    #[test]
    fn test_capacity_is_enforced() {
        let temp = TempStore::new("capacity");
        let store = HistoryStore::at(temp.dir.join("history.json")).with_limit(3);
        for i in 0..5 {
            store.record(Path::new(&format!("/var/log/{i}.log"))).unwrap();
        }

        let history = store.load().unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].path, "/var/log/4.log");
    }

    #[test]
    fn test_legacy_format_migrates() {
        let temp = TempStore::new("legacy");
        fs::create_dir_all(&temp.dir).unwrap();
        fs::write(
            temp.dir.join("history.json"),
            r#"["/var/log/old.log", "/var/log/older.log"]"#,
        )
        .unwrap();

        let history = temp.store.load().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].file_name, "old.log");
        assert!(history[0].accessed_at.is_none());
    }

    #[test]
    fn test_malformed_file_is_an_error_on_load() {
        let temp = TempStore::new("malformed");
        fs::create_dir_all(&temp.dir).unwrap();
        fs::write(temp.dir.join("history.json"), "{not json").unwrap();

        assert!(matches!(
            temp.store.load(),
            Err(HistoryError::Malformed { .. })
        ));
    }

    #[test]
    fn test_record_over_malformed_file_starts_fresh() {
        let temp = TempStore::new("recover");
        fs::create_dir_all(&temp.dir).unwrap();
        fs::write(temp.dir.join("history.json"), "{not json").unwrap();

        temp.store.record(Path::new("/var/log/a.log")).unwrap();
        assert_eq!(temp.store.load().unwrap().len(), 1);
    }
}
