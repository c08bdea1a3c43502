// Activity aggregation — per-(user, subreddit) counts and per-user totals.
//
// Users whose total falls below the lurker threshold are removed from both
// maps before anything downstream sees them. Ordered maps keep the output
// independent of input order.

use std::collections::BTreeMap;

use tracing::debug;

use crate::ingest::records::PostRecord;

/// Default minimum number of posts for a user to be vectorized.
pub const DEFAULT_LURKER_THRESHOLD: u32 = 3;

/// Aggregated activity for the users that survived the lurker cutoff.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityTable {
    /// Post count keyed by (user_id, subreddit).
    pub counts: BTreeMap<(String, String), u32>,
    /// Total posts per user across all subreddits.
    pub totals: BTreeMap<String, u32>,
    /// Users seen in the records but dropped for falling below the threshold.
    pub lurkers_dropped: usize,
}

impl ActivityTable {
    pub fn user_count(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Sorted user ids of the surviving set.
    pub fn users(&self) -> impl Iterator<Item = &str> {
        self.totals.keys().map(String::as_str)
    }
}

/// Count posts per (user, subreddit) and per user, then drop lurkers.
///
/// An empty record set yields an empty table, not an error.
pub fn aggregate(records: &[PostRecord], lurker_threshold: u32) -> ActivityTable {
    let mut counts: BTreeMap<(String, String), u32> = BTreeMap::new();
    let mut totals: BTreeMap<String, u32> = BTreeMap::new();

    for record in records {
        *counts
            .entry((record.user_id.clone(), record.subreddit.clone()))
            .or_insert(0) += 1;
        *totals.entry(record.user_id.clone()).or_insert(0) += 1;
    }

    let users_seen = totals.len();
    totals.retain(|_, total| *total >= lurker_threshold);
    counts.retain(|(user, _), _| totals.contains_key(user));
    let lurkers_dropped = users_seen - totals.len();

    debug!(
        users_seen,
        surviving = totals.len(),
        lurkers_dropped,
        lurker_threshold,
        "Aggregated activity"
    );

    ActivityTable {
        counts,
        totals,
        lurkers_dropped,
    }
}
