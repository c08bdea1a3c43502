// Typed failure kinds for the graph engine.
//
// Everything else (CSV parse errors, IO) travels as anyhow::Error with
// context attached at the boundary where it happened.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Input file not found: {}", path.display())]
    MissingInputFile { path: PathBuf },

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Only `VectorSet::from_rows` returns this; vectors from the pipeline
    /// always match the vocabulary size.
    #[error("Vector for {user} has {found} coordinates, expected {expected}")]
    DimensionMismatch {
        user: String,
        expected: usize,
        found: usize,
    },

    #[error("Row {row}: cannot parse post_created_time {value:?}")]
    InvalidTimestamp { row: usize, value: String },
}
