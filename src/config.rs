use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::pipeline::EngineParams;

/// Default location of the edge list when neither a flag nor SUBSIM_OUTPUT is set.
pub const DEFAULT_OUTPUT_PATH: &str = "output/edges.txt";

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded at startup via dotenvy. CLI flags override
/// whatever is found here; the engine itself only ever sees `params`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Dataset CSV (SUBSIM_INPUT). No default — must come from env or a flag.
    pub input_path: Option<PathBuf>,
    /// Edge list destination (SUBSIM_OUTPUT)
    pub output_path: PathBuf,
    pub params: EngineParams,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset variables fall back to the engine defaults. A variable that is
    /// set but does not parse is an error naming the variable.
    pub fn load() -> Result<Self> {
        let defaults = EngineParams::default();

        let params = EngineParams {
            lurker_threshold: env_or("SUBSIM_LURKER_THRESHOLD", defaults.lurker_threshold)?,
            duplicate_threshold: env_or(
                "SUBSIM_DUPLICATE_THRESHOLD",
                defaults.duplicate_threshold,
            )?,
            max_dedup_iterations: env_or(
                "SUBSIM_MAX_DEDUP_ITERATIONS",
                defaults.max_dedup_iterations,
            )?,
            edge_threshold: env_or("SUBSIM_EDGE_THRESHOLD", defaults.edge_threshold)?,
        };

        Ok(Self {
            input_path: env::var("SUBSIM_INPUT").ok().map(PathBuf::from),
            output_path: env::var("SUBSIM_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_PATH)),
            params,
        })
    }

    /// Resolve the dataset path: an explicit flag wins over SUBSIM_INPUT.
    pub fn require_input(&self, flag: Option<PathBuf>) -> Result<PathBuf> {
        match flag.or_else(|| self.input_path.clone()) {
            Some(path) => Ok(path),
            None => anyhow::bail!(
                "No input dataset given. Pass --input <CSV> or set SUBSIM_INPUT in your .env file."
            ),
        }
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}
