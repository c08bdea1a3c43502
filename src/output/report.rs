// JSON run report — the RunReport written next to the edge list for
// later comparison between parameter settings.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::pipeline::RunReport;

/// Write the run report as pretty-printed JSON, creating parent directories.
pub fn write_run_report(report: &RunReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let json = serde_json::to_string_pretty(report).context("Failed to serialize run report")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write run report {}", path.display()))?;

    info!(path = %path.display(), "Wrote run report");
    Ok(())
}
