use std::path::PathBuf;

use apipack_descriptor::AppliedDefault;
use apipack_model::{Classifier, Phase};
use apipack_normalize::{FullApiSummary, NormalizeSummary, PackageSummary};
use apipack_validate::ValidationOutcome;

use crate::lifecycle::ExecutedGoal;

/// Result of a `build` run.
#[derive(Debug, Clone)]
pub struct BuildResult {
    /// `<groupId>:<assetId>:<version>` after resolution.
    pub coordinates: String,
    pub classifier: Classifier,
    pub until: Phase,
    pub build_dir: PathBuf,
    /// Defaults written back to the descriptor.
    pub applied: Vec<AppliedDefault>,
    pub goals: Vec<ExecutedGoal>,
    pub full_api: Option<FullApiSummary>,
    pub validation: Option<ValidationOutcome>,
    pub report_path: Option<PathBuf>,
    pub package: Option<PackageSummary>,
}

/// Result of a standalone `normalize` run.
#[derive(Debug, Clone)]
pub struct NormalizeResult {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub summary: NormalizeSummary,
}
