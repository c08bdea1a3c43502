// Dataset ingestion — CSV loading and record-level filtering.

pub mod filter;
pub mod records;
