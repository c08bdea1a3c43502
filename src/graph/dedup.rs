// Near-duplicate user removal.
//
// Accounts that post in exactly the same proportions (bots, multi-accounts)
// add nothing to the graph except O(n²) cost. Each round takes an owned
// snapshot, compares every pair, and keeps only the first user of each
// cluster of vectors at or above the duplicate threshold. Snapshots are
// sorted by user id, so "first" means lexicographically smallest.
//
// Rounds repeat until one leaves the set unchanged or the iteration cap is
// hit.

use serde::Serialize;
use tracing::{debug, info};

use super::cosine::{meets_threshold, similarity_matrix};
use crate::activity::vectors::VectorSet;

pub const DEFAULT_DUPLICATE_THRESHOLD: f64 = 1.0;
pub const DEFAULT_MAX_DEDUP_ITERATIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DedupSettings {
    /// Cosine similarity at or above which the later user is dropped.
    pub threshold: f64,
    /// Hard cap on the number of rounds.
    pub max_iterations: usize,
}

impl Default for DedupSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_DUPLICATE_THRESHOLD,
            max_iterations: DEFAULT_MAX_DEDUP_ITERATIONS,
        }
    }
}

/// Set sizes at the start and end of one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DedupRound {
    pub round: usize,
    pub users_before: usize,
    pub users_after: usize,
}

impl DedupRound {
    pub fn removed(&self) -> usize {
        self.users_before - self.users_after
    }
}

#[derive(Debug, Clone)]
pub struct DedupOutcome {
    pub vectors: VectorSet,
    pub rounds: Vec<DedupRound>,
    /// True when the last round removed nothing (as opposed to hitting the cap).
    pub converged: bool,
}

/// Termination predicate: a round that did not shrink the set.
pub fn is_fixed_point(users_before: usize, users_after: usize) -> bool {
    users_before == users_after
}

/// Mark rows that duplicate an earlier, unmarked row.
///
/// Pairs are scanned as (i, j) with i < j in snapshot order. A marked row is
/// never used as an anchor, so each cluster keeps exactly its first member.
pub fn mark_duplicates(snapshot: &VectorSet, threshold: f64) -> Vec<bool> {
    let n = snapshot.len();
    let mut marked = vec![false; n];
    if n < 2 {
        return marked;
    }

    let sims = similarity_matrix(snapshot.matrix());
    for i in 0..n {
        if marked[i] {
            continue;
        }
        for j in (i + 1)..n {
            if !marked[j] && meets_threshold(sims[[i, j]], threshold) {
                marked[j] = true;
            }
        }
    }

    marked
}

/// One deduplication round: returns the next snapshot.
pub fn dedup_round(snapshot: &VectorSet, threshold: f64) -> VectorSet {
    let marked = mark_duplicates(snapshot, threshold);
    let keep: Vec<usize> = (0..marked.len()).filter(|&i| !marked[i]).collect();
    snapshot.select(&keep)
}

/// Run rounds until a fixed point or `max_iterations`, whichever comes first.
pub fn deduplicate(vectors: VectorSet, settings: &DedupSettings) -> DedupOutcome {
    let mut current = vectors;
    let mut rounds = Vec::new();
    let mut converged = false;

    for round in 1..=settings.max_iterations {
        let users_before = current.len();
        let next = dedup_round(&current, settings.threshold);
        let users_after = next.len();

        debug!(round, users_before, users_after, "Dedup round complete");
        rounds.push(DedupRound {
            round,
            users_before,
            users_after,
        });
        current = next;

        if is_fixed_point(users_before, users_after) {
            converged = true;
            break;
        }
    }

    info!(
        rounds = rounds.len(),
        remaining = current.len(),
        converged,
        threshold = settings.threshold,
        "Deduplication finished"
    );

    DedupOutcome {
        vectors: current,
        rounds,
        converged,
    }
}
