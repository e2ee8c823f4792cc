//! Depth-first normalization of a dependency tree.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, info_span};

use crate::error::{NormalizeError, Result};
use crate::extract::extract_zip;
use crate::layout::split_group_segments;

/// One extracted archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedArchive {
    pub source: PathBuf,
    /// Directory the entries were written to.
    pub target_dir: PathBuf,
    pub entries: usize,
    /// True when the group path was collapsed into a dotted id.
    pub repaired: bool,
}

/// Result of a normalization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeSummary {
    pub archives: Vec<ExtractedArchive>,
}

impl NormalizeSummary {
    pub fn archive_count(&self) -> usize {
        self.archives.len()
    }

    pub fn repaired_count(&self) -> usize {
        self.archives.iter().filter(|archive| archive.repaired).count()
    }
}

/// Extracts every archive below `source` into `dest`, one directory per
/// `<group>/<asset>/<version>`.
#[derive(Debug, Clone)]
pub struct ArchiveNormalizer {
    source: PathBuf,
    dest: PathBuf,
}

impl ArchiveNormalizer {
    pub fn new(source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn dest(&self) -> &Path {
        &self.dest
    }

    /// Run the pass. The first I/O or archive failure aborts it.
    pub fn normalize(&self) -> Result<NormalizeSummary> {
        let _span = info_span!("normalize", source = %self.source.display()).entered();
        if !self.source.is_dir() {
            return Err(NormalizeError::NotADirectory {
                path: self.source.clone(),
            });
        }

        let mut summary = NormalizeSummary::default();
        self.visit_dir(&self.source, &self.dest, &mut summary)?;
        info!(
            archives = summary.archive_count(),
            repaired = summary.repaired_count(),
            "dependencies normalized"
        );
        Ok(summary)
    }

    fn visit_dir(&self, dir: &Path, target: &Path, summary: &mut NormalizeSummary) -> Result<()> {
        let (dirs, archives) = list_children(dir)?;
        for child in dirs {
            let Some(name) = child.file_name() else {
                continue;
            };
            self.visit_dir(&child, &target.join(name), summary)?;
        }
        for archive in archives {
            let Some(name) = archive.file_name() else {
                continue;
            };
            let extracted = self.extract(&archive, &target.join(name))?;
            summary.archives.push(extracted);
        }
        Ok(())
    }

    fn extract(&self, archive: &Path, mirrored: &Path) -> Result<ExtractedArchive> {
        let (target, repaired) = match split_group_segments(mirrored, &self.dest) {
            Some(segments) => (segments.target(&self.dest), segments.repaired),
            None => (mirrored.to_path_buf(), false),
        };
        if repaired {
            debug!(
                from = %mirrored.display(),
                to = %target.display(),
                "collapsed multi-level group path"
            );
        }
        let target_dir = target
            .parent()
            .map_or_else(|| self.dest.clone(), Path::to_path_buf);
        let entries = extract_zip(archive, &target_dir)?;
        debug!(archive = %archive.display(), entries, "extracted");
        Ok(ExtractedArchive {
            source: archive.to_path_buf(),
            target_dir,
            entries,
            repaired,
        })
    }
}

/// Subdirectories and `.zip` files of `dir`, each sorted by name.
fn list_children(dir: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let read_dir = fs::read_dir(dir).map_err(|source| NormalizeError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut dirs = Vec::new();
    let mut archives = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|source| NormalizeError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        } else if path.is_file() && is_archive(&path) {
            archives.push(path);
        }
    }
    dirs.sort();
    archives.sort();
    Ok((dirs, archives))
}

fn is_archive(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "zip")
}
