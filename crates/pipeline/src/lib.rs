//! End-to-end orchestration of the `ang` IR-to-artifact pipeline (spec
//! §5.8, supplemented). Everything here is sequencing: the actual work
//! lives in `ang-ir`, `ang-depgraph`, `ang-planner`, `ang-flow`,
//! `ang-astgen`, and `ang-emit`.

mod config;
mod report;
mod run;

pub use config::PipelineConfig;
pub use report::RunReport;
pub use run::{run, PipelineError};
