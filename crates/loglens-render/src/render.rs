use chrono::{DateTime, NaiveDateTime};

use loglens_types::{FilteredView, LogLevel};

use crate::highlight::highlight_matches;

/// Upper bound on rendered entries per view
pub const MAX_DISPLAY: usize = 1000;

/// One rendered record
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayEntry {
    pub level: LogLevel,

    /// Display-formatted timestamp, or the original literal when it could
    /// not be parsed
    pub timestamp: Option<String>,

    /// Escaped message with highlight markers applied
    pub message: String,
}

/// One unit of displayable output
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplayUnit {
    Entry(DisplayEntry),

    /// Terminal marker shown when the view exceeds the display bound
    Truncated { shown: usize, total: usize },

    /// Sole unit produced for an empty view
    Placeholder,
}

impl DisplayUnit {
    /// Text form for markers and placeholders
    pub fn label(&self) -> String {
        match self {
            Self::Entry(entry) => entry.message.clone(),
            Self::Truncated { shown, total } => {
                format!("Showing first {shown} of {total} entries")
            }
            Self::Placeholder => "No log entries to display".to_string(),
        }
    }
}

/// Render a bounded prefix of the view, in original order.
///
/// An empty view yields a single placeholder; a view longer than
/// `max_display` yields exactly `max_display` entries plus one truncation
/// marker carrying the shown and total counts.
pub fn render_view(view: &FilteredView, query: &str, max_display: usize) -> Vec<DisplayUnit> {
    if view.is_empty() {
        return vec![DisplayUnit::Placeholder];
    }

    // whitespace-only input is no query at all
    let query = if query.trim().is_empty() { "" } else { query };

    let mut units: Vec<DisplayUnit> = view
        .records
        .iter()
        .take(max_display)
        .map(|record| {
            DisplayUnit::Entry(DisplayEntry {
                level: record.level,
                timestamp: record.timestamp.as_deref().map(format_timestamp),
                message: highlight_matches(&record.message, query),
            })
        })
        .collect();

    if view.len() > max_display {
        units.push(DisplayUnit::Truncated {
            shown: max_display,
            total: view.len(),
        });
    }

    units
}

/// Format a timestamp for display as "MM-DD HH:MM:SS.mmm".
///
/// An unparseable timestamp is shown as its original literal, never dropped.
pub fn format_timestamp(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|t| t.format("%m-%d %H:%M:%S%.3f").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.naive_local());
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(t);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use loglens_types::LogRecord;
    use std::sync::Arc;

    fn view_of(count: usize) -> FilteredView {
        let records = (0..count)
            .map(|i| {
                Arc::new(LogRecord::new(
                    i as u64,
                    LogLevel::Info,
                    format!("entry {i}"),
                ))
            })
            .collect();
        FilteredView::new(records)
    }

    #[test]
    fn test_empty_view_yields_single_placeholder() {
        let units = render_view(&FilteredView::default(), "", MAX_DISPLAY);
        assert_eq!(units, vec![DisplayUnit::Placeholder]);
    }

    #[test]
    fn test_long_view_is_truncated_with_marker() {
        let units = render_view(&view_of(1500), "", MAX_DISPLAY);
        assert_eq!(units.len(), MAX_DISPLAY + 1);
        assert_eq!(
            units.last(),
            Some(&DisplayUnit::Truncated {
                shown: 1000,
                total: 1500
            })
        );
        assert!(units.last().unwrap().label().contains("1000 of 1500"));
    }

    #[test]
    fn test_view_at_bound_has_no_marker() {
        let units = render_view(&view_of(MAX_DISPLAY), "", MAX_DISPLAY);
        assert_eq!(units.len(), MAX_DISPLAY);
        assert!(matches!(units.last(), Some(DisplayUnit::Entry(_))));
    }

    #[test]
    fn test_entries_render_in_original_order() {
        let units = render_view(&view_of(3), "", MAX_DISPLAY);
        let messages: Vec<String> = units.iter().map(DisplayUnit::label).collect();
        assert_eq!(messages, vec!["entry 0", "entry 1", "entry 2"]);
    }

    #[test]
    fn test_messages_are_escaped_and_highlighted() {
        let record = Arc::new(LogRecord::new(
            0,
            LogLevel::Error,
            "<script>alert(1)</script>".to_string(),
        ));
        let view = FilteredView::new(vec![record]);
        let units = render_view(&view, "scr", MAX_DISPLAY);

        let DisplayUnit::Entry(entry) = &units[0] else {
            panic!("expected an entry");
        };
        assert!(entry.message.contains("&lt;"));
        assert!(entry.message.contains("<mark class=\"search-highlight\">scr</mark>"));
    }

    #[test]
    fn test_whitespace_query_is_not_highlighted() {
        let units = render_view(&view_of(1), "   ", MAX_DISPLAY);
        let DisplayUnit::Entry(entry) = &units[0] else {
            panic!("expected an entry");
        };
        assert!(!entry.message.contains("<mark"));
    }

    #[test]
    fn test_unparseable_timestamp_passes_through() {
        assert_eq!(format_timestamp("last tuesday"), "last tuesday");
    }

    #[test]
    fn test_timestamp_display_format() {
        assert_eq!(
            format_timestamp("2024-01-15T10:30:00.123Z"),
            "01-15 10:30:00.123"
        );
        assert_eq!(format_timestamp("2024-01-15 10:30:00"), "01-15 10:30:00.000");
    }
}
