//! Recursive copy of API sources.

use std::fs;
use std::path::{Path, PathBuf};

use apipack_model::layout::ORG_CONFIG_DIR;
use tracing::trace;

use crate::error::{NormalizeError, Result};

/// Version control directories never copied into an API tree, including the
/// API version control folder holding the organization config.
pub const VCS_DIRS: &[&str] = &[".git", ".svn", ".hg", ORG_CONFIG_DIR];

/// Decides which paths of a project are API sources.
#[derive(Debug, Clone, Default)]
pub struct SourceFilter {
    excluded: Vec<PathBuf>,
}

impl SourceFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude `path` and everything below it.
    #[must_use]
    pub fn exclude(mut self, path: impl Into<PathBuf>) -> Self {
        self.excluded.push(path.into());
        self
    }

    pub fn accepts(&self, path: &Path) -> bool {
        if self.excluded.iter().any(|excluded| path.starts_with(excluded)) {
            return false;
        }
        !path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| VCS_DIRS.contains(&name))
    }
}

/// Copy the files below `from` into `to`, skipping what `filter` rejects.
///
/// Existing files in `to` are overwritten. Returns the number of files copied.
pub fn copy_tree(from: &Path, to: &Path, filter: &SourceFilter) -> Result<usize> {
    fs::create_dir_all(to).map_err(|source| NormalizeError::CreateDir {
        path: to.to_path_buf(),
        source,
    })?;

    let read_dir = fs::read_dir(from).map_err(|source| NormalizeError::ReadDir {
        path: from.to_path_buf(),
        source,
    })?;
    let mut children = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|source| NormalizeError::ReadDir {
            path: from.to_path_buf(),
            source,
        })?;
        children.push(entry.path());
    }
    children.sort();

    let mut copied = 0;
    for child in children {
        if !filter.accepts(&child) {
            trace!(path = %child.display(), "skipping");
            continue;
        }
        let Some(name) = child.file_name() else {
            continue;
        };
        let dest = to.join(name);
        if child.is_dir() {
            copied += copy_tree(&child, &dest, filter)?;
        } else if child.is_file() {
            fs::copy(&child, &dest).map_err(|source| NormalizeError::Copy {
                from: child.clone(),
                to: dest.clone(),
                source,
            })?;
            copied += 1;
        }
    }
    Ok(copied)
}
