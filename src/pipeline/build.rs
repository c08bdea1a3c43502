// Graph build pipeline: aggregate → vectorize → deduplicate → compare.
//
// Each stage takes the previous stage's output by value or by reference and
// returns a fresh value; nothing is shared or mutated across stages. The
// caller handles loading records beforehand and writing edges afterwards.

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::activity::aggregate::{aggregate, DEFAULT_LURKER_THRESHOLD};
use crate::activity::vectors::{build_vectors, Vocabulary};
use crate::error::EngineError;
use crate::graph::dedup::{
    deduplicate, DedupRound, DedupSettings, DEFAULT_DUPLICATE_THRESHOLD,
    DEFAULT_MAX_DEDUP_ITERATIONS,
};
use crate::graph::similarity::{
    build_graph, SimilarityGraph, SimilarityStats, DEFAULT_EDGE_THRESHOLD,
};
use crate::ingest::records::PostRecord;

/// Tuning knobs for one engine run. Always passed explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EngineParams {
    /// Minimum total posts for a user to be vectorized at all.
    pub lurker_threshold: u32,
    /// Similarity at or above which a later user is dropped as a duplicate.
    pub duplicate_threshold: f64,
    pub max_dedup_iterations: usize,
    /// Similarity at or above which two users get an edge.
    pub edge_threshold: f64,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            lurker_threshold: DEFAULT_LURKER_THRESHOLD,
            duplicate_threshold: DEFAULT_DUPLICATE_THRESHOLD,
            max_dedup_iterations: DEFAULT_MAX_DEDUP_ITERATIONS,
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
        }
    }
}

impl EngineParams {
    /// Reject thresholds no cosine similarity can be compared against.
    pub fn validate(&self) -> Result<(), EngineError> {
        check_similarity_threshold("duplicate_threshold", self.duplicate_threshold)?;
        check_similarity_threshold("edge_threshold", self.edge_threshold)?;
        if self.max_dedup_iterations == 0 {
            return Err(EngineError::InvalidParameter {
                name: "max_dedup_iterations",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn dedup_settings(&self) -> DedupSettings {
        DedupSettings {
            threshold: self.duplicate_threshold,
            max_iterations: self.max_dedup_iterations,
        }
    }
}

fn check_similarity_threshold(name: &'static str, value: f64) -> Result<(), EngineError> {
    if !value.is_finite() || !(-1.0..=1.0).contains(&value) {
        return Err(EngineError::InvalidParameter {
            name,
            reason: format!("{value} is outside [-1, 1]"),
        });
    }
    Ok(())
}

/// What happened during a run, stage by stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub params: EngineParams,
    pub records: usize,
    pub users_seen: usize,
    pub lurkers_dropped: usize,
    pub vocabulary_size: usize,
    pub users_vectorized: usize,
    pub dedup_rounds: Vec<DedupRound>,
    pub dedup_converged: bool,
    pub users_after_dedup: usize,
    pub edges: usize,
    pub connected_users: usize,
    pub similarity: Option<SimilarityStats>,
}

impl RunReport {
    pub fn duplicates_removed(&self) -> usize {
        self.users_vectorized - self.users_after_dedup
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub graph: SimilarityGraph,
    pub report: RunReport,
}

/// Run the engine over a record set.
///
/// Records are expected to be date-filtered and free of exact duplicates.
/// An empty record set, or one where every user is a lurker, produces an
/// empty graph.
pub fn run(records: &[PostRecord], params: &EngineParams) -> Result<PipelineOutput> {
    params.validate()?;

    let vocabulary = Vocabulary::from_records(records);
    let activity = aggregate(records, params.lurker_threshold);
    let users_seen = activity.user_count() + activity.lurkers_dropped;
    info!(
        records = records.len(),
        users_seen,
        surviving = activity.user_count(),
        subreddits = vocabulary.len(),
        "Aggregated activity"
    );

    let vectors = build_vectors(&activity, &vocabulary);
    let users_vectorized = vectors.len();
    info!(users = users_vectorized, dim = vectors.dim(), "Vectorized users");

    let dedup = deduplicate(vectors, &params.dedup_settings());
    let users_after_dedup = dedup.vectors.len();

    let graph = build_graph(&dedup.vectors, params.edge_threshold);

    let report = RunReport {
        params: *params,
        records: records.len(),
        users_seen,
        lurkers_dropped: activity.lurkers_dropped,
        vocabulary_size: vocabulary.len(),
        users_vectorized,
        dedup_rounds: dedup.rounds,
        dedup_converged: dedup.converged,
        users_after_dedup,
        edges: graph.edge_count(),
        connected_users: graph.node_count(),
        similarity: graph.stats,
    };

    Ok(PipelineOutput { graph, report })
}
