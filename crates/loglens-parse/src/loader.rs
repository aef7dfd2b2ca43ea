use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Local};
use tracing::debug;

use loglens_types::{EntrySnapshot, FileMeta};

use crate::error::ParseError;
use crate::parser::LogParser;

/// Load and parse a log file into an immutable snapshot.
///
/// Fails for unreadable files and for files that yield no records at all;
/// the caller's previous snapshot stays untouched in both cases.
pub fn load_file(path: impl AsRef<Path>) -> Result<EntrySnapshot, ParseError> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let content = fs::read_to_string(path).map_err(|source| ParseError::Read {
        path: display.clone(),
        source,
    })?;

    let metadata = fs::metadata(path).map_err(|source| ParseError::Metadata {
        path: display.clone(),
        source,
    })?;

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();

    let modified = metadata
        .modified()
        .ok()
        .map(|t| DateTime::<Local>::from(t).format("%Y-%m-%d %H:%M:%S").to_string());

    let records = LogParser::new().parse_content(&content);
    if records.is_empty() {
        return Err(ParseError::Empty { path: display });
    }

    debug!(path = %path.display(), records = records.len(), "parsed log file");

    let file = FileMeta {
        name,
        path: display,
        size_bytes: metadata.len(),
        modified,
    };

    Ok(EntrySnapshot::new(
        file,
        records.into_iter().map(Arc::new).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("loglens-loader-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let err = load_file("/definitely/not/here.log").unwrap_err();
        assert!(matches!(err, ParseError::Read { .. }));
    }

    #[test]
    fn test_load_empty_file_is_empty_error() {
        let path = temp_path("empty.log");
        fs::File::create(&path).unwrap();

        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, ParseError::Empty { .. }));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_file_captures_metadata() {
        let path = temp_path("meta.log");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "2024-01-15T10:30:00Z INFO hello").unwrap();
        drop(file);

        let snapshot = load_file(&path).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.file().name.starts_with("loglens-loader-"));
        assert!(snapshot.file().size_bytes > 0);

        fs::remove_file(&path).unwrap();
    }
}
