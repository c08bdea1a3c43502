// Post record loading from the tabular dataset export.
//
// The dataset is a CSV with one row per post. Only three columns matter to
// the graph engine: `author_name`, `subreddit` and `post_created_time`. Any
// other columns (title, body, score...) are ignored by the deserializer.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::EngineError;

/// A single post, reduced to the fields the engine needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PostRecord {
    pub user_id: String,
    pub subreddit: String,
    pub timestamp: DateTime<Utc>,
}

impl PostRecord {
    pub fn new(user_id: &str, subreddit: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.to_string(),
            subreddit: subreddit.to_string(),
            timestamp,
        }
    }
}

/// Row shape as it appears in the CSV export.
#[derive(Debug, Deserialize)]
struct RawPost {
    author_name: String,
    subreddit: String,
    post_created_time: String,
}

/// Load post records from a CSV file.
///
/// Fails with `EngineError::MissingInputFile` if the path does not exist,
/// so the CLI can report it distinctly from a malformed file.
pub fn load_posts(path: &Path) -> Result<Vec<PostRecord>> {
    if !path.exists() {
        return Err(EngineError::MissingInputFile {
            path: path.to_path_buf(),
        }
        .into());
    }

    let file =
        File::open(path).with_context(|| format!("Failed to open dataset {}", path.display()))?;
    read_posts(file).with_context(|| format!("Failed to read dataset {}", path.display()))
}

/// Read post records from any CSV source with a header row.
///
/// Rows with an empty author or subreddit are skipped (they cannot be placed
/// in the graph). A timestamp that cannot be parsed is a hard error.
pub fn read_posts<R: Read>(reader: R) -> Result<Vec<PostRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut posts = Vec::new();
    let mut skipped = 0usize;

    for (i, row) in csv_reader.deserialize::<RawPost>().enumerate() {
        // 1-based, not counting the header
        let row_number = i + 1;
        let raw = row.with_context(|| format!("Failed to parse CSV row {row_number}"))?;

        if raw.author_name.is_empty() || raw.subreddit.is_empty() {
            skipped += 1;
            continue;
        }

        let timestamp = parse_timestamp(&raw.post_created_time).ok_or_else(|| {
            EngineError::InvalidTimestamp {
                row: row_number,
                value: raw.post_created_time.clone(),
            }
        })?;

        posts.push(PostRecord {
            user_id: raw.author_name,
            subreddit: raw.subreddit,
            timestamp,
        });
    }

    if skipped > 0 {
        warn!(skipped, "Skipped rows with an empty author_name or subreddit");
    }
    debug!(count = posts.len(), "Loaded post records");

    Ok(posts)
}

/// Parse a `post_created_time` value.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[.fff]` (read as UTC), a bare
/// `YYYY-MM-DD`, or Unix seconds (integer or fractional).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    let secs = raw.parse::<f64>().ok().filter(|s| s.is_finite())?;
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_rfc3339() {
        let ts = parse_timestamp("2023-03-01T12:30:00+02:00").unwrap();
        assert_eq!(ts.hour(), 10);
        assert_eq!(ts.day(), 1);
    }

    #[test]
    fn test_parse_naive_datetime() {
        let ts = parse_timestamp("2023-03-01 12:30:45").unwrap();
        assert_eq!(ts.hour(), 12);
        assert_eq!(ts.second(), 45);
    }

    #[test]
    fn test_parse_naive_datetime_with_fraction() {
        let ts = parse_timestamp("2023-03-01 12:30:45.250").unwrap();
        assert_eq!(ts.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_parse_date_only() {
        let ts = parse_timestamp("2023-03-01").unwrap();
        assert_eq!(ts.hour(), 0);
        assert_eq!(ts.month(), 3);
    }

    #[test]
    fn test_parse_unix_seconds() {
        let ts = parse_timestamp("1677672000").unwrap();
        assert_eq!(ts.timestamp(), 1_677_672_000);
    }

    #[test]
    fn test_parse_fractional_unix_seconds() {
        let ts = parse_timestamp("1677672000.5").unwrap();
        assert_eq!(ts.timestamp(), 1_677_672_000);
        assert_eq!(ts.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("NaN").is_none());
    }

    #[test]
    fn test_read_posts_ignores_extra_columns() {
        let csv = "post_id,author_name,subreddit,post_created_time,title\n\
                   1,alice,rust,2023-03-01 10:00:00,hello\n\
                   2,bob,golang,2023-03-02 11:00:00,world\n";
        let posts = read_posts(csv.as_bytes()).unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].user_id, "alice");
        assert_eq!(posts[1].subreddit, "golang");
    }

    #[test]
    fn test_read_posts_skips_blank_identity() {
        let csv = "author_name,subreddit,post_created_time\n\
                   ,rust,2023-03-01\n\
                   alice,,2023-03-01\n\
                   alice,rust,2023-03-01\n";
        let posts = read_posts(csv.as_bytes()).unwrap();
        assert_eq!(posts.len(), 1);
    }

    #[test]
    fn test_read_posts_reports_bad_timestamp_row() {
        let csv = "author_name,subreddit,post_created_time\n\
                   alice,rust,2023-03-01\n\
                   bob,rust,not-a-date\n";
        let err = read_posts(csv.as_bytes()).unwrap_err();
        match err.downcast_ref::<EngineError>() {
            Some(EngineError::InvalidTimestamp { row, value }) => {
                assert_eq!(*row, 2);
                assert_eq!(value, "not-a-date");
            }
            other => panic!("Expected InvalidTimestamp, got {other:?}"),
        }
    }

    #[test]
    fn test_read_posts_missing_column_is_error() {
        let csv = "author_name,post_created_time\nalice,2023-03-01\n";
        assert!(read_posts(csv.as_bytes()).is_err());
    }
}
