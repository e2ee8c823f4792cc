//! Data model for API specification packaging.
//!
//! - [`ProjectDescriptor`] / [`DependencyRef`]: the `exchange.json` document
//! - [`BuildDescriptor`] / [`PluginBinding`]: the build unit handed to the host
//! - [`SpecReport`]: parse and validation findings
//! - [`BuildSwitches`]: run-wide switches passed explicitly to each stage

pub mod build;
pub mod descriptor;
pub mod error;
pub mod layout;
pub mod report;
pub mod switches;

pub use build::{
    BuildConfig, BuildDependency, BuildDescriptor, ConfigValue, Configuration, Phase,
    PluginBinding, PluginCoordinates, Repository,
};
pub use descriptor::{Classifier, DependencyRef, Extensions, ProjectDescriptor, RAML_FRAGMENT};
pub use error::{ModelError, Result};
pub use layout::ProjectLayout;
pub use report::{IssueSeverity, SpecIssue, SpecReport};
pub use switches::BuildSwitches;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_counts() {
        let report = SpecReport::new(
            "api.raml",
            "RAML 1.0",
            vec![
                SpecIssue::violation("missing title"),
                SpecIssue::warning("unused trait"),
            ],
        );
        assert_eq!(report.violation_count(), 1);
        assert_eq!(report.warning_count(), 1);
        assert!(!report.conforms);
    }

    #[test]
    fn phases_are_ordered() {
        assert!(Phase::GenerateSources < Phase::Compile);
        assert!(Phase::Compile < Phase::Package);
        assert!(Phase::Package < Phase::Install);
        assert!(Phase::Install < Phase::Deploy);
    }
}
