// All-pairs similarity and edge thresholding.
//
// The similarity matrix is computed once for the deduplicated set; only the
// strict upper triangle (i < j) is scanned, which rules out self-edges and
// mirrored duplicates. Every scanned value also feeds the summary statistics.
// The edge threshold is compared exactly: no pair below it becomes an edge.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::info;

use super::cosine::similarity_matrix;
use crate::activity::vectors::VectorSet;

pub const DEFAULT_EDGE_THRESHOLD: f64 = 0.95;

/// An undirected edge between two distinct users.
///
/// The similarity is kept for reporting only; the written edge list is
/// unweighted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub similarity: f64,
}

/// Distribution of pairwise similarities over the scanned upper triangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimilarityStats {
    pub pairs: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityGraph {
    /// Edges in upper-triangle scan order.
    pub edges: Vec<Edge>,
    /// None when fewer than two users were compared.
    pub stats: Option<SimilarityStats>,
    pub threshold: f64,
}

impl SimilarityGraph {
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of distinct users touched by at least one edge.
    pub fn node_count(&self) -> usize {
        self.edges
            .iter()
            .flat_map(|e| [e.source.as_str(), e.target.as_str()])
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// The `n` most similar pairs, strongest first.
    pub fn strongest(&self, n: usize) -> Vec<&Edge> {
        let mut edges: Vec<&Edge> = self.edges.iter().collect();
        edges.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        edges.truncate(n);
        edges
    }
}

/// Compare every pair of users and keep those at or above `edge_threshold`.
pub fn build_graph(vectors: &VectorSet, edge_threshold: f64) -> SimilarityGraph {
    let n = vectors.len();
    let users = vectors.users();
    let sims = similarity_matrix(vectors.matrix());

    let mut edges = Vec::new();
    let mut scanned = Vec::with_capacity(n * n.saturating_sub(1) / 2);

    for i in 0..n {
        for j in (i + 1)..n {
            let similarity = sims[[i, j]];
            scanned.push(similarity);
            if similarity >= edge_threshold {
                edges.push(Edge {
                    source: users[i].clone(),
                    target: users[j].clone(),
                    similarity,
                });
            }
        }
    }

    let stats = summarize(&mut scanned);
    if let Some(s) = &stats {
        info!(
            pairs = s.pairs,
            mean = s.mean,
            median = s.median,
            edges = edges.len(),
            edge_threshold,
            "Similarity scan complete"
        );
    } else {
        info!(users = n, "Fewer than two users, no pairs to compare");
    }

    SimilarityGraph {
        edges,
        stats,
        threshold: edge_threshold,
    }
}

/// Mean, median and range of a set of similarities. Sorts `values` in place.
///
/// The median of an even-sized set is the mean of the two middle values.
pub fn summarize(values: &mut [f64]) -> Option<SimilarityStats> {
    if values.is_empty() {
        return None;
    }

    values.sort_unstable_by(f64::total_cmp);
    let pairs = values.len();
    let mean = values.iter().sum::<f64>() / pairs as f64;
    let mid = pairs / 2;
    let median = if pairs % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    };

    Some(SimilarityStats {
        pairs,
        mean,
        median,
        min: values[0],
        max: values[pairs - 1],
    })
}
