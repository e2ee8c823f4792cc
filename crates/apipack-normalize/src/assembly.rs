//! Full API tree and package directory assembly.

use std::path::{Path, PathBuf};

use apipack_model::ProjectLayout;
use tracing::{info, info_span};

use crate::error::Result;
use crate::sources::{SourceFilter, copy_tree};
use crate::walk::{ArchiveNormalizer, NormalizeSummary};

/// Outcome of assembling the full API tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullApiSummary {
    pub full_api_dir: PathBuf,
    pub modules: NormalizeSummary,
    pub source_files: usize,
}

/// Build `<build>/full-api`: normalized dependencies under `exchange_modules`
/// plus a copy of the project sources.
///
/// `dependencies_dir` defaults to `<build>/dependencies`. A missing
/// dependencies directory means the project has no dependencies.
pub fn assemble_full_api(
    layout: &ProjectLayout,
    dependencies_dir: Option<&Path>,
) -> Result<FullApiSummary> {
    let _span = info_span!("full_api", project = %layout.project_dir.display()).entered();
    let full_api_dir = layout.full_api_dir();
    let dependencies_dir =
        dependencies_dir.map_or_else(|| layout.dependencies_dir(), Path::to_path_buf);

    let modules = if dependencies_dir.is_dir() {
        ArchiveNormalizer::new(&dependencies_dir, layout.modules_dir()).normalize()?
    } else {
        info!(path = %dependencies_dir.display(), "no dependencies to normalize");
        NormalizeSummary::default()
    };

    let filter = SourceFilter::new()
        .exclude(layout.scratch_dir())
        .exclude(&layout.build_dir);
    let source_files = copy_tree(&layout.project_dir, &full_api_dir, &filter)?;
    info!(
        path = %full_api_dir.display(),
        source_files,
        modules = modules.archive_count(),
        "full API assembled"
    );

    Ok(FullApiSummary {
        full_api_dir,
        modules,
        source_files,
    })
}

/// Outcome of packaging the full API tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSummary {
    pub package_dir: PathBuf,
    pub files: usize,
}

/// Copy the full API tree into `<build>/<asset>-<version>-<classifier>`.
pub fn package_api(
    layout: &ProjectLayout,
    asset_id: &str,
    version: &str,
    classifier: &str,
) -> Result<PackageSummary> {
    let package_dir = layout.package_dir(asset_id, version, classifier);
    let files = copy_tree(&layout.full_api_dir(), &package_dir, &SourceFilter::new())?;
    info!(path = %package_dir.display(), files, "API packaged");
    Ok(PackageSummary { package_dir, files })
}
