// Behavioral vectors — each user's share of posts per subreddit.
//
// The vocabulary is every distinct subreddit in the full record set, sorted,
// so the dimension is fixed for the run even when some columns end up unused
// by the surviving users. Rows are kept sorted by user id; that order is the
// tie-break order for deduplication.

use std::collections::{BTreeSet, HashMap};

use ndarray::{Array2, ArrayView1, Axis};
use tracing::{debug, warn};

use super::aggregate::ActivityTable;
use crate::error::EngineError;
use crate::ingest::records::PostRecord;

/// Sorted distinct subreddit names. Column `i` of every vector is `names[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    names: Vec<String>,
}

impl Vocabulary {
    /// Build the vocabulary from the full record set (before the lurker cutoff).
    pub fn from_records(records: &[PostRecord]) -> Self {
        let names: BTreeSet<&str> = records.iter().map(|r| r.subreddit.as_str()).collect();
        Self {
            names: names.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn index_of(&self, subreddit: &str) -> Option<usize> {
        self.names
            .binary_search_by(|name| name.as_str().cmp(subreddit))
            .ok()
    }
}

/// A snapshot of users and their vectors: row `i` of the matrix belongs to
/// `users[i]`, and `users` is sorted lexicographically.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorSet {
    users: Vec<String>,
    matrix: Array2<f64>,
}

impl VectorSet {
    /// Build a set from (user, coordinates) rows. Rows are sorted by user id.
    ///
    /// Construction helper for vectors that did not come from `build_vectors`
    /// (hand-built fixtures, verification). The pipeline never calls it. User
    /// ids are expected to be unique.
    pub fn from_rows(
        mut rows: Vec<(String, Vec<f64>)>,
        dim: usize,
    ) -> Result<Self, EngineError> {
        rows.sort_by(|a, b| a.0.cmp(&b.0));

        let mut users = Vec::with_capacity(rows.len());
        let mut matrix = Array2::<f64>::zeros((rows.len(), dim));
        for (i, (user, coords)) in rows.into_iter().enumerate() {
            if coords.len() != dim {
                return Err(EngineError::DimensionMismatch {
                    user,
                    expected: dim,
                    found: coords.len(),
                });
            }
            matrix.row_mut(i).assign(&ArrayView1::from(&coords[..]));
            users.push(user);
        }

        Ok(Self { users, matrix })
    }

    pub fn empty(dim: usize) -> Self {
        Self {
            users: Vec::new(),
            matrix: Array2::zeros((0, dim)),
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Vector dimension (vocabulary size).
    pub fn dim(&self) -> usize {
        self.matrix.ncols()
    }

    pub fn users(&self) -> &[String] {
        &self.users
    }

    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    pub fn vector(&self, user: &str) -> Option<ArrayView1<'_, f64>> {
        self.position(user).map(|i| self.matrix.row(i))
    }

    pub fn contains(&self, user: &str) -> bool {
        self.position(user).is_some()
    }

    fn position(&self, user: &str) -> Option<usize> {
        self.users
            .binary_search_by(|u| u.as_str().cmp(user))
            .ok()
    }

    /// New snapshot holding only the given rows, in ascending index order.
    pub fn select(&self, rows: &[usize]) -> Self {
        let mut rows = rows.to_vec();
        rows.sort_unstable();
        rows.dedup();

        Self {
            users: rows.iter().map(|&i| self.users[i].clone()).collect(),
            matrix: self.matrix.select(Axis(0), &rows),
        }
    }
}

/// Build one fractional vector per surviving user.
///
/// Coordinate `s` of user `u` is `count(u, s) / total(u)`; subreddits the
/// user never posted in stay 0.
pub fn build_vectors(table: &ActivityTable, vocabulary: &Vocabulary) -> VectorSet {
    let users: Vec<String> = table.totals.keys().cloned().collect();
    let row_of: HashMap<&str, usize> = users
        .iter()
        .enumerate()
        .map(|(i, u)| (u.as_str(), i))
        .collect();

    let mut matrix = Array2::<f64>::zeros((users.len(), vocabulary.len()));
    let mut unknown_subreddits = 0usize;

    for ((user, subreddit), &count) in &table.counts {
        let Some(&row) = row_of.get(user.as_str()) else {
            continue;
        };
        let Some(col) = vocabulary.index_of(subreddit) else {
            unknown_subreddits += 1;
            continue;
        };
        let total = table.totals[user];
        if total > 0 {
            matrix[[row, col]] = f64::from(count) / f64::from(total);
        }
    }

    if unknown_subreddits > 0 {
        warn!(
            unknown_subreddits,
            "Activity references subreddits missing from the vocabulary"
        );
    }
    debug!(
        users = users.len(),
        dim = vocabulary.len(),
        "Built behavioral vectors"
    );

    VectorSet { users, matrix }
}
