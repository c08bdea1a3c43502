// Output formatting — terminal display and the JSON run report.

pub mod report;
pub mod terminal;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Shorten a user id or subreddit name to `max_chars` characters for a table
/// column, marking the cut with "...".
///
/// Counts characters, not bytes, so ids with non-ASCII letters are cut cleanly.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Spinner for a stage with no meaningful length (loading, the O(n²) build).
/// Hidden automatically when stderr is not a terminal.
pub fn stage_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner} {msg} ({elapsed})") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
