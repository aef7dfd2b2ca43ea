use chrono::{DateTime, Local};

use loglens_types::HistoryRecord;

/// Records under one date label, in input order
#[derive(Clone, Debug)]
pub struct HistoryGroup {
    pub label: String,
    pub records: Vec<HistoryRecord>,
}

/// Partition a recency-ordered history list into date buckets.
///
/// A record's effective date is its access time, or `now` when the access
/// time is unknown. Buckets are labelled "Today", "Yesterday", or a month
/// and day, and come out in first-seen input order; the upstream source
/// owns any ordering contract, this never sorts.
pub fn group_by_day(records: &[HistoryRecord], now: DateTime<Local>) -> Vec<HistoryGroup> {
    let today = now.date_naive();
    let yesterday = today.pred_opt();

    let mut groups: Vec<HistoryGroup> = Vec::new();
    for record in records {
        let effective = record.accessed_at.unwrap_or(now).date_naive();
        let label = if effective == today {
            "Today".to_string()
        } else if Some(effective) == yesterday {
            "Yesterday".to_string()
        } else {
            effective.format("%B %-d").to_string()
        };

        match groups.iter_mut().find(|g| g.label == label) {
            Some(group) => group.records.push(record.clone()),
            None => groups.push(HistoryGroup {
                label,
                records: vec![record.clone()],
            }),
        }
    }

    groups
}

const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Format a byte count with binary units, one decimal digit, trailing
/// ".0" trimmed
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let formatted = format!("{value:.1}");
    let trimmed = formatted.strip_suffix(".0").unwrap_or(&formatted);
    format!("{trimmed} {}", SIZE_UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(name: &str, accessed_at: Option<DateTime<Local>>) -> HistoryRecord {
        HistoryRecord {
            path: format!("/var/log/{name}"),
            file_name: name.to_string(),
            accessed_at,
            size_bytes: 0,
        }
    }

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_groups_today_yesterday_and_dated() {
        let now = fixed_now();
        let records = vec![
            record("a.log", Some(now)),
            record("b.log", Some(now - chrono::Duration::days(1))),
            record("c.log", Some(now - chrono::Duration::days(10))),
        ];

        let groups = group_by_day(&records, now);
        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["Today", "Yesterday", "March 5"]);
        assert!(groups.iter().all(|g| g.records.len() == 1));
    }

    #[test]
    fn test_unknown_access_time_lands_in_today() {
        let now = fixed_now();
        let groups = group_by_day(&[record("a.log", None)], now);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label, "Today");
    }

    #[test]
    fn test_record_order_is_preserved_within_buckets() {
        let now = fixed_now();
        let records = vec![
            record("first.log", Some(now)),
            record("old.log", Some(now - chrono::Duration::days(3))),
            record("second.log", Some(now)),
        ];

        let groups = group_by_day(&records, now);
        assert_eq!(groups[0].label, "Today");
        let names: Vec<&str> = groups[0]
            .records
            .iter()
            .map(|r| r.file_name.as_str())
            .collect();
        assert_eq!(names, vec!["first.log", "second.log"]);
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(500), "500 B");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5 MB");
        assert_eq!(format_file_size(2_684_354_560), "2.5 GB");
    }
}
