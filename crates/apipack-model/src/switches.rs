//! Build-wide switches.

use serde::{Deserialize, Serialize};

/// Switches controlling one packaging run.
///
/// Built once at the edge (CLI flags and environment) and passed explicitly
/// to the resolver, synthesizer and validator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSwitches {
    /// Skip the specification validation goal entirely.
    pub skip_validation: bool,
    /// Skip the secondary (connector) generation sub-builds.
    pub skip_rest_connect: bool,
    /// Organization id used when the descriptor has no `groupId`.
    pub group_id_override: Option<String>,
}

impl BuildSwitches {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_skip_validation(mut self, skip: bool) -> Self {
        self.skip_validation = skip;
        self
    }

    #[must_use]
    pub fn with_skip_rest_connect(mut self, skip: bool) -> Self {
        self.skip_rest_connect = skip;
        self
    }

    /// Set the group id override; blank values are treated as absent.
    #[must_use]
    pub fn with_group_id_override(mut self, group_id: Option<String>) -> Self {
        self.group_id_override = group_id.filter(|value| !value.trim().is_empty());
        self
    }
}
