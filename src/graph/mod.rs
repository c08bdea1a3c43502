// Similarity graph construction — deduplication, all-pairs cosine
// similarity, and the edge list writer.

pub mod cosine;
pub mod dedup;
pub mod edges;
pub mod similarity;
