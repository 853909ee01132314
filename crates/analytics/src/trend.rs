//! Usage Trend Series

use chrono::{DateTime, Duration, NaiveDate, Utc};
use file_catalog::FileRecord;
use serde::Serialize;

/// Cumulative bytes held at the end of one day
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsagePoint {
    pub date: NaiveDate,
    pub bytes: u64,
}

/// Daily cumulative usage over the trailing `days` days
///
/// Each point counts every unarchived file created on or before that day,
/// so the series is monotonic for a growing catalog.
pub fn usage_trend(records: &[FileRecord], days: usize, now: DateTime<Utc>) -> Vec<UsagePoint> {
    let today = now.date_naive();
    (0..days)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset as i64);
            let bytes = records
                .iter()
                .filter(|r| !r.archived && r.created_at.date_naive() <= date)
                .map(|r| r.size_bytes)
                .sum();
            UsagePoint { date, bytes }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_is_cumulative() {
        let now = Utc::now();
        let records = vec![
            FileRecord::new("old.bin", "/", 100, now - Duration::days(10)),
            FileRecord::new("recent.bin", "/", 50, now - Duration::days(1)),
        ];

        let trend = usage_trend(&records, 7, now);
        assert_eq!(trend.len(), 7);
        // Oldest point predates the recent file
        assert_eq!(trend[0].bytes, 100);
        // Latest point sees both
        assert_eq!(trend[6].bytes, 150);
        assert_eq!(trend[6].date, now.date_naive());
        assert!(trend.windows(2).all(|w| w[0].bytes <= w[1].bytes));
    }

    #[test]
    fn test_trend_skips_archived() {
        let now = Utc::now();
        let mut archived = FileRecord::new("gone.bin", "/", 500, now - Duration::days(5));
        archived.archived = true;
        let trend = usage_trend(&[archived], 3, now);
        assert!(trend.iter().all(|p| p.bytes == 0));
    }
}
