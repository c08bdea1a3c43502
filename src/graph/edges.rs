// Edge list writer.
//
// Format: one `user_a user_b` line per edge, space separated, no header and
// no weights, in the order the similarity scan produced them. User ids are
// written as-is; an id containing whitespace will split into extra columns
// for whatever reads the file.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::similarity::Edge;

/// Write edges to any writer.
pub fn write_edges<W: Write>(edges: &[Edge], writer: W) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    let mut unsafe_ids = 0usize;

    for edge in edges {
        if has_whitespace(&edge.source) || has_whitespace(&edge.target) {
            unsafe_ids += 1;
        }
        writeln!(writer, "{} {}", edge.source, edge.target)?;
    }
    writer.flush()?;

    if unsafe_ids > 0 {
        warn!(
            edges = unsafe_ids,
            "Edges with whitespace in a user id were written unescaped"
        );
    }
    Ok(())
}

/// Write the edge list to `path`, replacing any existing file.
///
/// Parent directories are created if needed.
pub fn write_edge_list(edges: &[Edge], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create edge list {}", path.display()))?;
    write_edges(edges, file)
        .with_context(|| format!("Failed to write edge list {}", path.display()))?;

    info!(edges = edges.len(), path = %path.display(), "Wrote edge list");
    Ok(())
}

/// Read an edge list back as (user_a, user_b) pairs.
///
/// Verification helper for checking a written file; the build never reads
/// edges back. Blank lines are skipped; a line without exactly two fields is
/// an error.
pub fn read_edge_list(path: &Path) -> Result<Vec<(String, String)>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open edge list {}", path.display()))?;

    let mut pairs = Vec::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(' ').collect();
        match fields.as_slice() {
            [a, b] => pairs.push((a.to_string(), b.to_string())),
            _ => anyhow::bail!(
                "{}:{}: expected two space-separated user ids, got {:?}",
                path.display(),
                i + 1,
                line
            ),
        }
    }
    Ok(pairs)
}

fn has_whitespace(id: &str) -> bool {
    id.chars().any(char::is_whitespace)
}
