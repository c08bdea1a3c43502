// Subsim: behavioral similarity graphs from subreddit posting activity
//
// This is the library root. Each module corresponds to one stage of the
// graph build, plus the loading and reporting around it.

pub mod activity;
pub mod config;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod inspect;
pub mod output;
pub mod pipeline;
