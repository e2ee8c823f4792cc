//! Project descriptor to build descriptor conversion.

use apipack_model::build::BASEDIR_PLACEHOLDER;
use apipack_model::layout::{REST_CONNECT_DIR, SCRATCH_DIR, TARGET_DIR};
use apipack_model::{
    BuildConfig, BuildDependency, BuildDescriptor, BuildSwitches, Configuration, DependencyRef,
    Phase, PluginBinding, PluginCoordinates, ProjectDescriptor, RAML_FRAGMENT, Repository,
};
use tracing::debug;

pub const MODEL_VERSION: &str = "4.0.0";

pub const PACKAGER_GROUP_ID: &str = "org.mule.maven.exchange";
pub const PACKAGER_ARTIFACT_ID: &str = "exchange_api_packager";
pub const PACKAGER_VERSION: &str = "1.0-SNAPSHOT";

pub const INVOKER_GROUP_ID: &str = "org.apache.maven.plugins";
pub const INVOKER_ARTIFACT_ID: &str = "maven-invoker-plugin";
pub const INVOKER_VERSION: &str = "3.2.0";

/// Goal names bound by the packager plugin.
pub mod goals {
    pub const GENERATE_FULL_API: &str = "generate-full-api";
    pub const VALIDATE_API: &str = "validate-api";
    pub const PACKAGE_API: &str = "package-api";
    pub const REST_CONNECT: &str = "rest-connect";
    /// Invoker goal running the connector sub-build.
    pub const RUN: &str = "run";
}

/// Dependency packaging forced on every API dependency.
pub const DEPENDENCY_TYPE: &str = "zip";

/// The repository every API dependency is resolved from.
pub fn exchange_repository() -> Repository {
    Repository {
        id: "anypoint-exchange-v2".to_string(),
        name: "Anypoint Exchange".to_string(),
        url: "https://maven.anypoint.mulesoft.com/api/v2/maven".to_string(),
        layout: "default".to_string(),
    }
}

/// Synthesize the build unit for a resolved descriptor.
///
/// Pure: the same descriptor and switches always give the same result.
pub fn synthesize(descriptor: &ProjectDescriptor, switches: &BuildSwitches) -> BuildDescriptor {
    let classifier = descriptor.classifier();
    let mut plugins = packager_bindings(descriptor);
    if !classifier.is_fragment() {
        plugins.push(invoker_binding(Phase::Install, switches));
        plugins.push(invoker_binding(Phase::Deploy, switches));
    }
    debug!(
        project = %descriptor.coordinates(),
        %classifier,
        bindings = plugins.len(),
        "build descriptor synthesized"
    );

    BuildDescriptor {
        model_version: MODEL_VERSION.to_string(),
        group_id: descriptor.group_id.clone(),
        artifact_id: descriptor.asset_id.clone(),
        version: descriptor.version.clone(),
        name: descriptor.name.clone(),
        repositories: vec![exchange_repository()],
        dependencies: descriptor.dependencies.iter().map(build_dependency).collect(),
        build: BuildConfig {
            directory: format!("{BASEDIR_PLACEHOLDER}/{SCRATCH_DIR}/{TARGET_DIR}"),
            source_directory: BASEDIR_PLACEHOLDER.to_string(),
            plugins,
        },
    }
}

fn build_dependency(dependency: &DependencyRef) -> BuildDependency {
    BuildDependency {
        group_id: dependency.group_id.clone(),
        artifact_id: dependency.asset_id.clone(),
        version: dependency.version.clone(),
        classifier: RAML_FRAGMENT.to_string(),
        kind: DEPENDENCY_TYPE.to_string(),
    }
}

fn packager_bindings(descriptor: &ProjectDescriptor) -> Vec<PluginBinding> {
    let plugin = PluginCoordinates::new(PACKAGER_GROUP_ID, PACKAGER_ARTIFACT_ID, PACKAGER_VERSION);
    let configuration = Configuration::new()
        .with_text("classifier", descriptor.classifier().as_str())
        .with_text("mainFile", descriptor.main_file().unwrap_or_default());

    let binding = |execution_id: &str, phase: Phase, goals: &[&str]| PluginBinding {
        plugin: plugin.clone(),
        execution_id: execution_id.to_string(),
        phase,
        goals: goals.iter().map(|goal| (*goal).to_string()).collect(),
        configuration: configuration.clone(),
    };

    vec![
        binding(
            goals::GENERATE_FULL_API,
            Phase::GenerateSources,
            &[goals::GENERATE_FULL_API],
        ),
        binding(goals::VALIDATE_API, Phase::Compile, &[goals::VALIDATE_API]),
        binding(
            "generate-artifacts",
            Phase::Package,
            &[goals::PACKAGE_API, goals::REST_CONNECT],
        ),
    ]
}

fn invoker_binding(phase: Phase, switches: &BuildSwitches) -> PluginBinding {
    // Skip docs and extension model generation in the connector sub-build.
    let properties = Configuration::new()
        .with_text("skipDocumentation", "true")
        .with_text("mule.maven.extension.model.disable", "true");
    let configuration = Configuration::new()
        .with_text("goals", phase.as_str())
        .with_text(
            "pom",
            format!("{BASEDIR_PLACEHOLDER}/{SCRATCH_DIR}/{TARGET_DIR}/{REST_CONNECT_DIR}/pom.xml"),
        )
        .with_text("skipInvocation", switches.skip_rest_connect.to_string())
        .with_nested("properties", properties);

    PluginBinding {
        plugin: PluginCoordinates::new(INVOKER_GROUP_ID, INVOKER_ARTIFACT_ID, INVOKER_VERSION),
        execution_id: format!("{}-{phase}", goals::REST_CONNECT),
        phase,
        goals: vec![goals::RUN.to_string()],
        configuration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(classifier: &str) -> ProjectDescriptor {
        ProjectDescriptor {
            main: Some("api.raml".to_string()),
            name: Some("Orders".to_string()),
            classifier: Some(classifier.to_string()),
            group_id: "acme".to_string(),
            asset_id: "orders".to_string(),
            version: "1.0.0".to_string(),
            ..ProjectDescriptor::default()
        }
    }

    #[test]
    fn test_bindings_are_in_phase_order() {
        for classifier in ["raml", "raml-fragment", "oas", "http"] {
            let build = synthesize(&descriptor(classifier), &BuildSwitches::default());
            let phases: Vec<Phase> = build.build.plugins.iter().map(|b| b.phase).collect();
            assert!(phases.windows(2).all(|pair| pair[0] <= pair[1]), "{classifier}");
        }
    }

    #[test]
    fn test_skip_switch_reaches_invoker() {
        let build = synthesize(
            &descriptor("raml"),
            &BuildSwitches::new().with_skip_rest_connect(true),
        );
        let install = build.bindings_for(Phase::Install).next().unwrap();
        assert_eq!(install.configuration.text("skipInvocation"), Some("true"));
        assert_eq!(install.execution_id, "rest-connect-install");
    }

    #[test]
    fn test_missing_main_renders_empty() {
        let mut project = descriptor("raml");
        project.main = None;
        let build = synthesize(&project, &BuildSwitches::default());
        let first = &build.build.plugins[0];
        assert_eq!(first.configuration.text("mainFile"), Some(""));
    }
}
