//! Identity resolution for project descriptors.

use std::fmt;
use std::path::{Path, PathBuf};

use apipack_model::layout::DEFAULT_VERSION;
use apipack_model::{BuildSwitches, ProjectDescriptor};
use tracing::{debug, info, warn};

use crate::error::{DescriptorError, Result};
use crate::io::{read_descriptor, write_descriptor};
use crate::org_id::find_org_id;

/// Where a filled-in group id came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupIdSource {
    /// The run-wide `--group-id` / `APIPACK_GROUP_ID` override.
    Override,
    /// An `orgId` entry in an organization config file.
    OrgConfig(PathBuf),
}

/// A default applied to a descriptor field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppliedDefault {
    AssetId(String),
    Version(String),
    GroupId { value: String, source: GroupIdSource },
}

impl fmt::Display for AppliedDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AssetId(value) => write!(f, "assetId = {value} (derived from name)"),
            Self::Version(value) => write!(f, "version = {value} (default)"),
            Self::GroupId {
                value,
                source: GroupIdSource::Override,
            } => write!(f, "groupId = {value} (override)"),
            Self::GroupId {
                value,
                source: GroupIdSource::OrgConfig(path),
            } => write!(f, "groupId = {value} (from {})", path.display()),
        }
    }
}

/// A resolved descriptor and the defaults applied to get there.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub descriptor: ProjectDescriptor,
    pub applied: Vec<AppliedDefault>,
    /// Set when the descriptor file was rewritten.
    pub rewritten: bool,
}

impl Resolution {
    pub fn modified(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// Derive an asset id from a display name.
///
/// Lower-cases and replaces spaces with hyphens; applying it twice gives the
/// same result as applying it once.
pub fn dasherize(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Fills the identity fields a descriptor left blank.
#[derive(Debug, Clone, Default)]
pub struct DescriptorResolver {
    group_id_override: Option<String>,
}

impl DescriptorResolver {
    pub fn new(switches: &BuildSwitches) -> Self {
        Self {
            group_id_override: switches.group_id_override.clone(),
        }
    }

    /// Resolve `descriptor`, which was read from `location`.
    ///
    /// Does not touch the file system apart from the organization config
    /// lookup; see [`DescriptorResolver::resolve_file`] for the persisting
    /// variant.
    pub fn resolve(&self, location: &Path, descriptor: ProjectDescriptor) -> Result<Resolution> {
        let mut descriptor = descriptor;
        let mut applied = Vec::new();

        if descriptor.asset_id.trim().is_empty() {
            let name = descriptor
                .name
                .as_deref()
                .filter(|name| !name.trim().is_empty())
                .ok_or_else(|| DescriptorError::MissingAssetId {
                    path: location.to_path_buf(),
                })?;
            descriptor.asset_id = dasherize(name);
            applied.push(AppliedDefault::AssetId(descriptor.asset_id.clone()));
        }

        if descriptor.version.trim().is_empty() {
            descriptor.version = DEFAULT_VERSION.to_string();
            applied.push(AppliedDefault::Version(descriptor.version.clone()));
        }

        if descriptor.group_id.trim().is_empty() {
            let (value, source) =
                self.guess_group_id(location)
                    .ok_or_else(|| DescriptorError::MissingGroupId {
                        path: location.to_path_buf(),
                    })?;
            descriptor.group_id = value.clone();
            applied.push(AppliedDefault::GroupId { value, source });
        }

        Ok(Resolution {
            descriptor,
            applied,
            rewritten: false,
        })
    }

    /// Read, resolve and, when defaults were applied, rewrite the descriptor.
    pub fn resolve_file(&self, location: &Path) -> Result<Resolution> {
        let descriptor = read_descriptor(location)?;
        let mut resolution = self.resolve(location, descriptor)?;
        if resolution.modified() {
            for default in &resolution.applied {
                info!(path = %location.display(), "applied {default}");
            }
            write_descriptor(location, &resolution.descriptor)?;
            resolution.rewritten = true;
            warn!(
                path = %location.display(),
                "descriptor was modified by the build"
            );
        } else {
            debug!(path = %location.display(), "descriptor already complete");
        }
        Ok(resolution)
    }

    fn guess_group_id(&self, location: &Path) -> Option<(String, GroupIdSource)> {
        if let Some(value) = &self.group_id_override {
            return Some((value.clone(), GroupIdSource::Override));
        }
        let project_dir = location.parent()?;
        find_org_id(project_dir).map(|org| (org.value, GroupIdSource::OrgConfig(org.source)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_dasherize() {
        assert_eq!(dasherize("My Orders API"), "my-orders-api");
        assert_eq!(dasherize("already-dashed"), "already-dashed");
        assert_eq!(dasherize("Two  Spaces"), "two--spaces");
    }

    #[test]
    fn test_override_wins() {
        let resolver = DescriptorResolver::new(
            &BuildSwitches::new().with_group_id_override(Some("acme".to_string())),
        );
        let descriptor = ProjectDescriptor {
            name: Some("Orders".to_string()),
            ..ProjectDescriptor::default()
        };
        let resolution = resolver
            .resolve(Path::new("/nonexistent/project/exchange.json"), descriptor)
            .unwrap();
        assert_eq!(resolution.descriptor.group_id, "acme");
        assert_eq!(resolution.descriptor.asset_id, "orders");
        assert_eq!(resolution.descriptor.version, DEFAULT_VERSION);
        assert_eq!(resolution.applied.len(), 3);
        assert!(resolution.applied.contains(&AppliedDefault::GroupId {
            value: "acme".to_string(),
            source: GroupIdSource::Override,
        }));
    }

    #[test]
    fn test_missing_name_and_asset_id() {
        let resolver = DescriptorResolver::default();
        let result = resolver.resolve(
            Path::new("/nonexistent/exchange.json"),
            ProjectDescriptor::default(),
        );
        assert!(matches!(result, Err(DescriptorError::MissingAssetId { .. })));
    }

    #[test]
    fn test_complete_descriptor_is_untouched() {
        let descriptor = ProjectDescriptor {
            name: Some("Orders".to_string()),
            group_id: "acme".to_string(),
            asset_id: "orders-api".to_string(),
            version: "2.1.0".to_string(),
            ..ProjectDescriptor::default()
        };
        let resolution = DescriptorResolver::default()
            .resolve(Path::new("/nonexistent/exchange.json"), descriptor.clone())
            .unwrap();
        assert!(!resolution.modified());
        assert_eq!(resolution.descriptor, descriptor);
    }

    proptest! {
        #[test]
        fn dasherize_is_idempotent(name in "[A-Za-z0-9 _-]{0,40}") {
            let once = dasherize(&name);
            prop_assert_eq!(dasherize(&once), once.clone());
            prop_assert!(!once.contains(' '));
        }

        #[test]
        fn derived_asset_id_resolves_once(name in "[A-Za-z][A-Za-z0-9 ]{0,30}") {
            let resolver = DescriptorResolver::new(
                &BuildSwitches::new().with_group_id_override(Some("acme".to_string())),
            );
            let location = Path::new("/nonexistent/exchange.json");
            let descriptor = ProjectDescriptor {
                name: Some(name.clone()),
                ..ProjectDescriptor::default()
            };
            let first = resolver.resolve(location, descriptor).unwrap();
            prop_assert_eq!(&first.descriptor.asset_id, &name.to_lowercase().replace(' ', "-"));
            let second = resolver.resolve(location, first.descriptor.clone()).unwrap();
            prop_assert!(!second.modified());
            prop_assert_eq!(second.descriptor, first.descriptor);
        }
    }
}
