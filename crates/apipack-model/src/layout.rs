//! On-disk layout conventions shared by every stage.

use std::path::{Path, PathBuf};

/// Descriptor file name at the project root.
pub const DESCRIPTOR_FILE: &str = "exchange.json";

/// Version assigned when the descriptor has none.
pub const DEFAULT_VERSION: &str = "1.0.0-SNAPSHOT";

/// Scratch directory at the project root; never copied into the package.
pub const SCRATCH_DIR: &str = ".exchange_modules_tmp";

/// Build output directory, relative to the scratch directory.
pub const TARGET_DIR: &str = "target";

/// Materialized dependency archives, relative to the build directory.
pub const DEPENDENCIES_DIR: &str = "dependencies";

/// Self-contained API tree, relative to the build directory.
pub const FULL_API_DIR: &str = "full-api";

/// Normalized dependency tree, relative to the full API directory.
pub const MODULES_DIR: &str = "exchange_modules";

/// Output of the secondary generation sub-build, relative to the build directory.
pub const REST_CONNECT_DIR: &str = "rest-connect";

/// Hidden directory holding the organization config.
pub const ORG_CONFIG_DIR: &str = ".apivcs";

/// Organization config file inside [`ORG_CONFIG_DIR`].
pub const ORG_CONFIG_FILE: &str = "config.properties";

/// Key holding the organization id in [`ORG_CONFIG_FILE`].
pub const ORG_ID_KEY: &str = "orgId";

/// Validation report written next to the full API tree.
pub const VALIDATION_REPORT_FILE: &str = "validation_report.json";

/// Resolved directories of one project build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    pub project_dir: PathBuf,
    pub build_dir: PathBuf,
}

impl ProjectLayout {
    /// Default layout for a project rooted at `project_dir`.
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        let project_dir = project_dir.into();
        let build_dir = project_dir.join(SCRATCH_DIR).join(TARGET_DIR);
        Self {
            project_dir,
            build_dir,
        }
    }

    /// Layout with an explicit build directory.
    pub fn with_build_dir(project_dir: impl Into<PathBuf>, build_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            build_dir: build_dir.into(),
        }
    }

    pub fn descriptor_path(&self) -> PathBuf {
        self.project_dir.join(DESCRIPTOR_FILE)
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.project_dir.join(SCRATCH_DIR)
    }

    pub fn dependencies_dir(&self) -> PathBuf {
        self.build_dir.join(DEPENDENCIES_DIR)
    }

    pub fn full_api_dir(&self) -> PathBuf {
        full_api_dir(&self.build_dir)
    }

    pub fn modules_dir(&self) -> PathBuf {
        self.full_api_dir().join(MODULES_DIR)
    }

    /// Package directory for `<asset>-<version>-<classifier>`.
    pub fn package_dir(&self, asset_id: &str, version: &str, classifier: &str) -> PathBuf {
        self.build_dir
            .join(format!("{asset_id}-{version}-{classifier}"))
    }
}

/// Full API directory inside a build directory.
pub fn full_api_dir(build_dir: &Path) -> PathBuf {
    build_dir.join(FULL_API_DIR)
}
