//! Resource resolution scoped to an API root.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use apipack_model::layout::MODULES_DIR;

/// Resolves and reads the documents a specification references.
///
/// References starting with `exchange_modules/` (or `/`) are resolved from
/// the API root, so dependency references land in the normalized dependency
/// tree. Everything else is relative to the referencing document. Nothing
/// outside the root is ever read.
#[derive(Debug, Clone)]
pub struct ResourceLoader {
    root: PathBuf,
}

impl ResourceLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: normalize_lexically(&root.into()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `reference` as written in the document at `from`.
    ///
    /// Returns `None` when the reference escapes the API root.
    pub fn resolve(&self, reference: &str, from: &Path) -> Option<PathBuf> {
        let reference = reference.trim();
        let candidate = if let Some(absolute) = reference.strip_prefix('/') {
            self.root.join(absolute)
        } else if reference.starts_with(MODULES_DIR) {
            self.root.join(reference)
        } else {
            from.parent().unwrap_or(&self.root).join(reference)
        };
        let candidate = normalize_lexically(&candidate);
        candidate.starts_with(&self.root).then_some(candidate)
    }

    /// Read a document below the root.
    pub fn read(&self, path: &Path) -> io::Result<String> {
        let path = normalize_lexically(path);
        if !path.starts_with(&self.root) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is outside the API root", path.display()),
            ));
        }
        fs::read_to_string(path)
    }

    /// Path of `path` relative to the root, for reports.
    pub fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

/// Collapse `.` and `..` without touching the file system.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_references() {
        let loader = ResourceLoader::new("/api");
        let from = Path::new("/api/resources/orders.raml");
        assert_eq!(
            loader.resolve("types/order.raml", from),
            Some(PathBuf::from("/api/resources/types/order.raml"))
        );
        assert_eq!(
            loader.resolve("../common.raml", from),
            Some(PathBuf::from("/api/common.raml"))
        );
        assert_eq!(loader.resolve("../../etc/passwd", from), None);
    }

    #[test]
    fn test_modules_resolve_from_root() {
        let loader = ResourceLoader::new("/api/./");
        let from = Path::new("/api/resources/orders.raml");
        assert_eq!(
            loader.resolve("exchange_modules/acme/types/1.0.0/lib.raml", from),
            Some(PathBuf::from("/api/exchange_modules/acme/types/1.0.0/lib.raml"))
        );
        assert_eq!(
            loader.resolve("/shared/traits.raml", from),
            Some(PathBuf::from("/api/shared/traits.raml"))
        );
    }

    #[test]
    fn test_display_path() {
        let loader = ResourceLoader::new("/api");
        assert_eq!(loader.display_path(Path::new("/api/a/b.raml")), "a/b.raml");
        assert_eq!(loader.display_path(Path::new("/x.raml")), "/x.raml");
    }
}
