use std::collections::HashMap;

use regex::Regex;
use serde_json::Value;

use loglens_types::{LogLevel, LogRecord};

/// Parser for extracting structured records from raw log text.
///
/// A line starts a new record when it carries an ISO-8601-like timestamp, a
/// recognizable level token, or a JSON object; any other non-empty line
/// continues the record before it.
pub struct LogParser {
    timestamp: Regex,
    level: Regex,
}

impl LogParser {
    pub fn new() -> Self {
        Self {
            timestamp: Regex::new(
                r"\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|[+-]\d{2}:\d{2})?",
            )
            .unwrap(),
            level: Regex::new(r"(?i)\b(ERROR|WARN|WARNING|INFO|DEBUG|TRACE|FATAL|PANIC)\b")
                .unwrap(),
        }
    }

    /// Parse full file content into ordered records
    pub fn parse_content(&self, content: &str) -> Vec<LogRecord> {
        let mut records = Vec::new();
        let mut current: Option<String> = None;
        let mut id = 0;

        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }

            // ANSI color codes from captured terminal output never belong
            // in stored messages
            let clean = strip_ansi_escapes::strip_str(line);

            if self.starts_new_record(&clean) {
                if let Some(text) = current.take() {
                    records.push(self.parse_record(&text, id));
                    id += 1;
                }
                current = Some(clean);
            } else if let Some(ref mut text) = current {
                text.push('\n');
                text.push_str(&clean);
            } else {
                current = Some(clean);
            }
        }

        if let Some(text) = current {
            records.push(self.parse_record(&text, id));
        }

        records
    }

    fn starts_new_record(&self, line: &str) -> bool {
        self.timestamp.is_match(line)
            || self.level.is_match(line)
            || line.trim_start().starts_with('{')
    }

    /// Parse one grouped entry into a record
    fn parse_record(&self, text: &str, id: u64) -> LogRecord {
        let timestamp = self.timestamp.find(text).map(|m| m.as_str().to_string());

        let level = self
            .level
            .find(text)
            .and_then(|m| LogLevel::parse(m.as_str()))
            .unwrap_or_default();

        let mut record = LogRecord::new(id, level, text.to_string());
        record.timestamp = timestamp;
        record.fields = Self::extract_fields(text);
        record
    }

    /// Flatten a JSON object body into string metadata
    fn extract_fields(text: &str) -> HashMap<String, String> {
        let trimmed = text.trim();
        if !trimmed.starts_with('{') {
            return HashMap::new();
        }

        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Object(map)) => map
                .into_iter()
                .map(|(key, value)| (key, field_display(value)))
                .collect(),
            _ => HashMap::new(),
        }
    }
}

impl Default for LogParser {
    fn default() -> Self {
        Self::new()
    }
}

/// String form of a JSON field value, without quoting plain strings
fn field_display(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamped_line() {
        let parser = LogParser::new();
        let records = parser.parse_content("2024-01-15T10:30:00.123Z INFO server started");
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].timestamp.as_deref(),
            Some("2024-01-15T10:30:00.123Z")
        );
        assert_eq!(records[0].level, LogLevel::Info);
    }

    #[test]
    fn test_parse_level_aliases() {
        let parser = LogParser::new();
        let records = parser.parse_content("WARNING: disk almost full\nFATAL: out of memory");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].level, LogLevel::Warn);
        assert_eq!(records[1].level, LogLevel::Error);
    }

    #[test]
    fn test_level_defaults_to_info() {
        let parser = LogParser::new();
        let records = parser.parse_content("2024-01-15 10:30:00 something happened");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, LogLevel::Info);
    }

    #[test]
    fn test_continuation_lines_group_into_one_record() {
        let content = "2024-01-15T10:30:00Z ERROR request failed\n    at handler.rs:42\n    at main.rs:7\n2024-01-15T10:30:01Z INFO retrying";
        let parser = LogParser::new();
        let records = parser.parse_content(content);
        assert_eq!(records.len(), 2);
        assert!(records[0].message.contains("handler.rs:42"));
        assert!(records[0].message.contains("main.rs:7"));
        assert_eq!(records[1].level, LogLevel::Info);
    }

    #[test]
    fn test_json_entry_populates_fields() {
        let parser = LogParser::new();
        let records =
            parser.parse_content(r#"{"level":"error","msg":"connection refused","port":5432}"#);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, LogLevel::Error);
        assert_eq!(
            records[0].fields.get("msg").map(String::as_str),
            Some("connection refused")
        );
        assert_eq!(records[0].fields.get("port").map(String::as_str), Some("5432"));
    }

    #[test]
    fn test_ansi_sequences_are_stripped() {
        let parser = LogParser::new();
        let records = parser.parse_content("\x1b[31mERROR\x1b[0m something broke");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "ERROR something broke");
    }

    #[test]
    fn test_empty_lines_are_skipped() {
        let parser = LogParser::new();
        let records = parser.parse_content("\n\nINFO one\n\n\nINFO two\n");
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_ids_are_sequential() {
        let parser = LogParser::new();
        let records = parser.parse_content("INFO a\nINFO b\nINFO c");
        let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }
}
