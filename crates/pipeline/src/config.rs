//! Runner configuration: the paths a caller supplies to drive one pipeline
//! run end to end.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root of the generated Go backend tree.
    pub out_dir: PathBuf,
    /// Directory holding FastAPI/template overrides on disk, if any. `None`
    /// runs entirely off the in-memory vocabulary and built-in renderers.
    pub templates_dir: Option<PathBuf>,
    /// Root of the generated frontend SDK tree (`endpoints.ts`,
    /// `sdk-manifest.json`, …).
    pub frontend_sdk_dir: PathBuf,
}
