//! Build descriptor handed to the build host.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Placeholder the build host replaces with the project directory.
pub const BASEDIR_PLACEHOLDER: &str = "${project.basedir}";

/// Build lifecycle phases a plugin can bind to, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    GenerateSources,
    Compile,
    Package,
    Install,
    Deploy,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::GenerateSources,
        Phase::Compile,
        Phase::Package,
        Phase::Install,
        Phase::Deploy,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GenerateSources => "generate-sources",
            Self::Compile => "compile",
            Self::Package => "package",
            Self::Install => "install",
            Self::Deploy => "deploy",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Phase::ALL
            .into_iter()
            .find(|phase| phase.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| ModelError::UnknownPhase(value.to_string()))
    }
}

/// Remote repository the build host resolves dependencies from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: String,
    pub name: String,
    pub url: String,
    pub layout: String,
}

/// A dependency as the build host sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub classifier: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Group, artifact and version of a build plugin.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginCoordinates {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl PluginCoordinates {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for PluginCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// A configuration value: plain text or a nested block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Text(String),
    Nested(Configuration),
}

/// Ordered plugin configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration {
    entries: Vec<(String, ConfigValue)>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_text(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries
            .push((key.into(), ConfigValue::Text(value.into())));
        self
    }

    #[must_use]
    pub fn with_nested(mut self, key: impl Into<String>, value: Configuration) -> Self {
        self.entries.push((key.into(), ConfigValue::Nested(value)));
        self
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    /// Text value for `key`, `None` when missing or nested.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(ConfigValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    pub fn nested(&self, key: &str) -> Option<&Configuration> {
        match self.get(key) {
            Some(ConfigValue::Nested(value)) => Some(value),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One lifecycle-phase attachment of a plugin goal set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginBinding {
    pub plugin: PluginCoordinates,
    pub execution_id: String,
    pub phase: Phase,
    pub goals: Vec<String>,
    pub configuration: Configuration,
}

/// Directories and plugin bindings of the build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    /// Output directory, relative to [`BASEDIR_PLACEHOLDER`].
    pub directory: String,
    pub source_directory: String,
    pub plugins: Vec<PluginBinding>,
}

impl BuildConfig {
    /// Concrete output directory for a project rooted at `basedir`.
    pub fn output_dir(&self, basedir: &Path) -> PathBuf {
        resolve_basedir(&self.directory, basedir)
    }

    /// Concrete source directory for a project rooted at `basedir`.
    pub fn source_dir(&self, basedir: &Path) -> PathBuf {
        resolve_basedir(&self.source_directory, basedir)
    }
}

/// Substitute the basedir placeholder with a concrete path.
pub fn resolve_basedir(template: &str, basedir: &Path) -> PathBuf {
    match template.strip_prefix(BASEDIR_PLACEHOLDER) {
        Some(rest) => {
            let rest = rest.trim_start_matches('/');
            if rest.is_empty() {
                basedir.to_path_buf()
            } else {
                rest.split('/')
                    .filter(|segment| !segment.is_empty())
                    .fold(basedir.to_path_buf(), |path, segment| path.join(segment))
            }
        }
        None => PathBuf::from(template),
    }
}

/// The synthesized build unit for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildDescriptor {
    pub model_version: String,
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub name: Option<String>,
    pub repositories: Vec<Repository>,
    pub dependencies: Vec<BuildDependency>,
    pub build: BuildConfig,
}

impl BuildDescriptor {
    /// Bindings attached to `phase`, in declaration order.
    pub fn bindings_for(&self, phase: Phase) -> impl Iterator<Item = &PluginBinding> {
        self.build
            .plugins
            .iter()
            .filter(move |binding| binding.phase == phase)
    }

    pub fn has_phase(&self, phase: Phase) -> bool {
        self.bindings_for(phase).next().is_some()
    }
}
