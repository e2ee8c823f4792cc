//! Group path repair for mirrored dependency archives.
//!
//! Downloaded dependencies are laid out as `<group...>/<asset>/<version>/<file>.zip`
//! where the group id may span several directory levels (`com/acme/apis`).
//! The normalized tree wants exactly one directory per group, with the levels
//! joined by `.` (`com.acme.apis`).

use std::path::{Path, PathBuf};

/// Upward steps taken from an archive before giving up on finding the root.
///
/// Four steps cover `<group>/<asset>/<version>/<file>`: any archive at that
/// depth or shallower is already canonical.
pub const MAX_WALK_STEPS: usize = 4;

/// Components kept below the group directory: asset, version and file name.
const SUFFIX_LEN: usize = 3;

/// An archive path split into group segments and the trailing suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegments {
    /// Directory levels that make up the group id, outermost first.
    pub group: Vec<String>,
    /// Remaining path below the group directory.
    pub suffix: PathBuf,
    /// True when the group spanned several levels and was collapsed.
    pub repaired: bool,
}

impl PathSegments {
    /// Dotted group id, e.g. `com.acme.apis`.
    pub fn group_id(&self) -> String {
        self.group.join(".")
    }

    /// Corrected archive path under `root`.
    pub fn target(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        if !self.group.is_empty() {
            path.push(self.group_id());
        }
        path.join(&self.suffix)
    }
}

/// Split the mirrored archive path `target` relative to the destination `root`.
///
/// Returns `None` when `target` is not below `root`; such paths are used
/// unchanged.
pub fn split_group_segments(target: &Path, root: &Path) -> Option<PathSegments> {
    let relative = target.strip_prefix(root).ok()?;
    let components: Vec<String> = relative
        .iter()
        .map(|component| component.to_string_lossy().into_owned())
        .collect();
    if components.is_empty() {
        return None;
    }

    if components.len() <= MAX_WALK_STEPS {
        // Canonical: the first level below the root is the group.
        let (group, suffix) = if components.len() > 1 {
            components.split_at(1)
        } else {
            components.split_at(0)
        };
        return Some(PathSegments {
            group: group.to_vec(),
            suffix: suffix.iter().collect(),
            repaired: false,
        });
    }

    let (group, suffix) = components.split_at(components.len() - SUFFIX_LEN);
    Some(PathSegments {
        group: group.to_vec(),
        suffix: suffix.iter().collect(),
        repaired: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_canonical_path_is_unchanged() {
        let root = Path::new("/out/exchange_modules");
        let target = root.join("acme/orders/1.0.0/orders.zip");
        let segments = split_group_segments(&target, root).unwrap();
        assert!(!segments.repaired);
        assert_eq!(segments.group_id(), "acme");
        assert_eq!(segments.target(root), target);
    }

    #[test]
    fn test_multi_level_group_is_collapsed() {
        let root = Path::new("/out/exchange_modules");
        let target = root.join("com/group/extra/asset/1.0.0/spec.zip");
        let segments = split_group_segments(&target, root).unwrap();
        assert!(segments.repaired);
        assert_eq!(segments.group, vec!["com", "group", "extra"]);
        assert_eq!(segments.suffix, PathBuf::from("asset/1.0.0/spec.zip"));
        assert_eq!(
            segments.target(root),
            root.join("com.group.extra/asset/1.0.0/spec.zip")
        );
    }

    #[test]
    fn test_shallow_paths_are_canonical() {
        let root = Path::new("/out");
        let single = split_group_segments(&root.join("spec.zip"), root).unwrap();
        assert!(single.group.is_empty());
        assert_eq!(single.target(root), root.join("spec.zip"));

        let two = split_group_segments(&root.join("asset/spec.zip"), root).unwrap();
        assert!(!two.repaired);
        assert_eq!(two.target(root), root.join("asset/spec.zip"));
    }

    #[test]
    fn test_outside_root() {
        assert_eq!(
            split_group_segments(Path::new("/elsewhere/a/b/c/d/e.zip"), Path::new("/out")),
            None
        );
        assert_eq!(split_group_segments(Path::new("/out"), Path::new("/out")), None);
    }

    proptest! {
        #[test]
        fn repaired_paths_are_canonical(
            group in proptest::collection::vec("[a-z][a-z0-9]{0,6}", 1..6),
            asset in "[a-z][a-z0-9-]{0,8}",
            version in "[0-9]\\.[0-9]\\.[0-9]",
        ) {
            let root = Path::new("/root/exchange_modules");
            let mut target = root.to_path_buf();
            for segment in &group {
                target.push(segment);
            }
            let target = target.join(&asset).join(&version).join("api.zip");

            let segments = split_group_segments(&target, root).unwrap();
            prop_assert_eq!(segments.repaired, group.len() > 1);
            let fixed = segments.target(root);
            prop_assert_eq!(
                &fixed,
                &root.join(group.join(".")).join(&asset).join(&version).join("api.zip")
            );

            let again = split_group_segments(&fixed, root).unwrap();
            prop_assert!(!again.repaired);
            prop_assert_eq!(again.target(root), fixed);
        }
    }
}
