//! Shared types for loglens
//!
//! This crate contains data structures used across multiple loglens crates.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

// ============================================================================
// Log Types
// ============================================================================

/// Log severity level
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    /// All levels, in display order
    pub const ALL: [LogLevel; 4] = [Self::Error, Self::Warn, Self::Info, Self::Debug];

    /// Parse a log level token from common formats, folding aliases onto
    /// the four-level model
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "error" | "err" | "fatal" | "panic" | "critical" | "crit" => Some(Self::Error),
            "warn" | "warning" | "wrn" => Some(Self::Warn),
            "info" | "inf" | "information" => Some(Self::Info),
            "debug" | "dbg" | "trace" | "trc" => Some(Self::Debug),
            _ => None,
        }
    }

    /// Canonical display string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::Info
    }
}

/// A single parsed log record. Immutable after creation; shared via `Arc`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogRecord {
    /// Sequential ID within the snapshot
    pub id: u64,

    /// Timestamp as found in the source line (kept verbatim; display
    /// formatting happens at render time)
    pub timestamp: Option<String>,

    /// Detected severity level
    pub level: LogLevel,

    /// Full entry text, including continuation lines
    pub message: String,

    /// Flattened JSON metadata, when the entry body is a JSON object
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub fields: HashMap<String, String>,
}

impl LogRecord {
    pub fn new(id: u64, level: LogLevel, message: String) -> Self {
        Self {
            id,
            timestamp: None,
            level,
            message,
            fields: HashMap::new(),
        }
    }
}

/// Shared handle to an immutable record
pub type ArcRecord = Arc<LogRecord>;

/// Metadata for a loaded log file
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: String,
    pub path: String,
    pub size_bytes: u64,
    pub modified: Option<String>,
}

/// The full, immutable record set for one loaded file.
///
/// Created once per successful load and wholly replaced on the next load;
/// never merged or mutated.
#[derive(Clone, Debug)]
pub struct EntrySnapshot {
    file: FileMeta,
    records: Vec<ArcRecord>,
}

impl EntrySnapshot {
    pub fn new(file: FileMeta, records: Vec<ArcRecord>) -> Self {
        Self { file, records }
    }

    pub fn file(&self) -> &FileMeta {
        &self.file
    }

    pub fn records(&self) -> &[ArcRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ============================================================================
// Filter Types
// ============================================================================

/// The user's current narrowing intent: a text query plus a level selection
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Free-text query; empty means no text filter
    pub query: String,

    /// Selected levels; an empty set and the full four-level set both mean
    /// "no level restriction"
    pub levels: HashSet<LogLevel>,
}

impl FilterCriteria {
    pub fn new(query: impl Into<String>, levels: HashSet<LogLevel>) -> Self {
        Self {
            query: query.into(),
            levels,
        }
    }

    /// Whether the level selection actually restricts anything
    pub fn level_restricted(&self) -> bool {
        !self.levels.is_empty() && self.levels.len() != LogLevel::ALL.len()
    }

    /// Whether the text query actually restricts anything
    pub fn query_restricted(&self) -> bool {
        !self.query.is_empty()
    }
}

/// The committed, order-preserving subsequence matching the current criteria
#[derive(Clone, Debug, Default)]
pub struct FilteredView {
    pub records: Vec<ArcRecord>,
}

impl FilteredView {
    pub fn new(records: Vec<ArcRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArcRecord> {
        self.records.iter()
    }
}

/// Per-level counts for the current view
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogStats {
    pub total: usize,
    pub error: usize,
    pub warn: usize,
    pub info: usize,
    pub debug: usize,
}

// ============================================================================
// History Types
// ============================================================================

/// A previously opened file, as stored in the history file
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub path: String,

    pub file_name: String,

    /// Local access time; `None` is the explicit "Unknown" sentinel carried
    /// over from legacy history files
    #[serde(with = "accessed_at_format")]
    pub accessed_at: Option<DateTime<Local>>,

    #[serde(default)]
    pub size_bytes: u64,
}

impl HistoryRecord {
    /// Display name: the stored file name, or the final path segment for
    /// legacy records that lack one
    pub fn display_name(&self) -> &str {
        if !self.file_name.is_empty() {
            return &self.file_name;
        }
        self.path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.path)
    }

    /// Access time as "HH:MM", when known
    pub fn time_label(&self) -> Option<String> {
        self.accessed_at.map(|t| t.format("%H:%M").to_string())
    }
}

/// Serializes `accessed_at` as "YYYY-MM-DD HH:MM:SS", with the literal
/// "Unknown" standing in for a missing time. Unparseable stored values read
/// back as unknown rather than failing the whole history file.
mod accessed_at_format {
    use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";
    const UNKNOWN: &str = "Unknown";

    pub fn serialize<S>(value: &Option<DateTime<Local>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(t) => serializer.serialize_str(&t.format(FORMAT).to_string()),
            None => serializer.serialize_str(UNKNOWN),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Local>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s == UNKNOWN {
            return Ok(None);
        }
        let parsed = NaiveDateTime::parse_from_str(&s, FORMAT)
            .ok()
            .and_then(|naive| Local.from_local_datetime(&naive).earliest());
        Ok(parsed)
    }
}
