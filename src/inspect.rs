// Dataset inspection — what a snapshot looks like before building a graph.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::activity::aggregate::aggregate;
use crate::ingest::records::PostRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub records: usize,
    pub users: usize,
    pub subreddits: usize,
    pub first_post: Option<DateTime<Utc>>,
    pub last_post: Option<DateTime<Utc>>,
    pub lurker_threshold: u32,
    /// Users that would be dropped at `lurker_threshold`.
    pub lurkers: usize,
    /// Busiest subreddits by post count, ties broken by name.
    pub top_subreddits: Vec<(String, usize)>,
}

pub fn summarize_dataset(
    records: &[PostRecord],
    lurker_threshold: u32,
    top: usize,
) -> DatasetSummary {
    let users: HashSet<&str> = records.iter().map(|r| r.user_id.as_str()).collect();

    let mut per_subreddit: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *per_subreddit.entry(record.subreddit.as_str()).or_insert(0) += 1;
    }

    let mut top_subreddits: Vec<(String, usize)> = per_subreddit
        .iter()
        .map(|(name, count)| (name.to_string(), *count))
        .collect();
    top_subreddits.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    top_subreddits.truncate(top);

    let activity = aggregate(records, lurker_threshold);

    DatasetSummary {
        records: records.len(),
        users: users.len(),
        subreddits: per_subreddit.len(),
        first_post: records.iter().map(|r| r.timestamp).min(),
        last_post: records.iter().map(|r| r.timestamp).max(),
        lurker_threshold,
        lurkers: activity.lurkers_dropped,
        top_subreddits,
    }
}
