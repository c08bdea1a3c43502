// Record-level filters applied before aggregation.
//
// Restricting the snapshot to a date window and dropping exact duplicate
// rows both happen here, so the aggregator can assume a clean record set.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use super::records::PostRecord;

/// Inclusive calendar-date window. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(since: Option<NaiveDate>, until: Option<NaiveDate>) -> Self {
        Self { since, until }
    }

    pub fn is_unbounded(&self) -> bool {
        self.since.is_none() && self.until.is_none()
    }

    /// Whether the timestamp's UTC date falls inside the window.
    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        let date = timestamp.date_naive();
        let after_start = self.since.map_or(true, |since| date >= since);
        let before_end = self.until.map_or(true, |until| date <= until);
        after_start && before_end
    }
}

/// Keep only records inside the date window.
pub fn filter_by_date(records: Vec<PostRecord>, range: &DateRange) -> Vec<PostRecord> {
    if range.is_unbounded() {
        return records;
    }

    let before = records.len();
    let kept: Vec<PostRecord> = records
        .into_iter()
        .filter(|r| range.contains(&r.timestamp))
        .collect();

    debug!(
        before,
        after = kept.len(),
        since = ?range.since,
        until = ?range.until,
        "Applied date filter"
    );
    kept
}

/// Drop records identical in user, subreddit and timestamp.
///
/// The first occurrence wins and input order is otherwise preserved.
pub fn remove_exact_duplicates(records: Vec<PostRecord>) -> Vec<PostRecord> {
    let before = records.len();
    let mut seen: HashSet<PostRecord> = HashSet::with_capacity(before);

    let kept: Vec<PostRecord> = records
        .into_iter()
        .filter(|r| seen.insert(r.clone()))
        .collect();

    debug!(before, after = kept.len(), "Removed exact duplicate records");
    kept
}
