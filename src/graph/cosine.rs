// Cosine similarity over row-vector matrices.
//
// Rows are normalized to unit length first, so the full similarity matrix is
// a single product of the normalized matrix with its own transpose. A
// zero-norm row is divided by 1.0 instead of 0.0: it stays the zero vector
// and scores 0.0 against everything, itself included.

use ndarray::Array2;

/// Slack applied to the duplicate threshold. Two identical distributions can
/// land a few ulps under 1.0 after normalization.
pub const SIMILARITY_TOLERANCE: f64 = 1e-9;

/// Whether a similarity clears the duplicate threshold, allowing for rounding error.
pub fn meets_threshold(similarity: f64, threshold: f64) -> bool {
    similarity >= threshold - SIMILARITY_TOLERANCE
}

/// Scale each row to unit L2 norm.
pub fn normalize_rows(matrix: &Array2<f64>) -> Array2<f64> {
    let mut normalized = matrix.clone();
    for mut row in normalized.rows_mut() {
        let norm = row.dot(&row).sqrt();
        let divisor = if norm > 0.0 { norm } else { 1.0 };
        row.mapv_inplace(|v| v / divisor);
    }
    normalized
}

/// Full n × n cosine similarity matrix for the rows of `matrix`.
///
/// Clamped to [-1, 1]: near-parallel rows can otherwise come out a few ulps
/// above 1.0.
pub fn similarity_matrix(matrix: &Array2<f64>) -> Array2<f64> {
    let normalized = normalize_rows(matrix);
    let mut sims = normalized.dot(&normalized.t());
    sims.mapv_inplace(|s| s.clamp(-1.0, 1.0));
    sims
}

/// Cosine similarity between two vectors, in [-1, 1].
///
/// Verification helper: the engine always goes through `similarity_matrix`.
/// This scores one pair directly so results can be cross-checked. Mismatched
/// or empty inputs score 0.0, as does any pair involving a zero vector.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    let mag_a = if mag_a > 0.0 { mag_a } else { 1.0 };
    let mag_b = if mag_b > 0.0 { mag_b } else { 1.0 };
    (dot / (mag_a * mag_b)).clamp(-1.0, 1.0)
}
