// Pipeline orchestration — the sequential hand-off between engine stages.

pub mod build;

pub use build::{run, EngineParams, PipelineOutput, RunReport};
