//! Run summary returned by [`crate::run`].

use ang_emit::MissingImpl;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RunReport {
    pub files_written: Vec<PathBuf>,
    pub missing_impls: Vec<MissingImpl>,
    pub duration: Duration,
}
