//! Build pipeline: resolve, synthesize, then run the lifecycle locally.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use apipack_build::{goals, synthesize, write_pom};
use apipack_descriptor::{DescriptorResolver, Resolution};
use apipack_model::{
    BuildDescriptor, BuildSwitches, Classifier, Phase, PluginBinding, ProjectLayout,
};
use apipack_normalize::{
    ArchiveNormalizer, FullApiSummary, PackageSummary, assemble_full_api, package_api,
};
use apipack_validate::{SpecEngine, SpecValidator, StructuralEngine, ValidationOutcome};
use tracing::{info, info_span, warn};

use crate::lifecycle::{GoalRunner, GoalStatus, run_lifecycle};
use crate::types::{BuildResult, NormalizeResult};

/// Inputs of a local build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub project_dir: PathBuf,
    pub until: Phase,
    /// Materialized dependency archives; defaults to `<build>/dependencies`.
    pub dependencies_dir: Option<PathBuf>,
    /// Overrides the build directory from the build descriptor.
    pub build_dir: Option<PathBuf>,
    pub switches: BuildSwitches,
}

impl BuildOptions {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            until: Phase::Package,
            dependencies_dir: None,
            build_dir: None,
            switches: BuildSwitches::default(),
        }
    }

    #[must_use]
    pub fn with_until(mut self, until: Phase) -> Self {
        self.until = until;
        self
    }

    #[must_use]
    pub fn with_dependencies_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.dependencies_dir = dir;
        self
    }

    #[must_use]
    pub fn with_build_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.build_dir = dir;
        self
    }

    #[must_use]
    pub fn with_switches(mut self, switches: BuildSwitches) -> Self {
        self.switches = switches;
        self
    }
}

/// Resolve the project descriptor, rewriting it when defaults were applied.
pub fn resolve_project(project_dir: &Path, switches: &BuildSwitches) -> Result<Resolution> {
    let layout = ProjectLayout::new(project_dir);
    DescriptorResolver::new(switches)
        .resolve_file(&layout.descriptor_path())
        .context("resolve project descriptor")
}

/// Resolve and synthesize without running anything.
pub fn plan_project(
    project_dir: &Path,
    switches: &BuildSwitches,
) -> Result<(Resolution, BuildDescriptor)> {
    let resolution = resolve_project(project_dir, switches)?;
    let build = synthesize(&resolution.descriptor, switches);
    Ok((resolution, build))
}

/// Resolve the project and write its POM to `output`.
pub fn export_pom(project_dir: &Path, switches: &BuildSwitches, output: &Path) -> Result<()> {
    let (_, build) = plan_project(project_dir, switches)?;
    write_pom(output, &build)?;
    info!(path = %output.display(), "POM written");
    Ok(())
}

/// Run a local build of the project up to `options.until`.
pub fn run_build(options: &BuildOptions) -> Result<BuildResult> {
    let _span = info_span!("build", project = %options.project_dir.display()).entered();
    let (resolution, build) = plan_project(&options.project_dir, &options.switches)?;
    let descriptor = &resolution.descriptor;

    let build_dir = options
        .build_dir
        .clone()
        .unwrap_or_else(|| build.build.output_dir(&options.project_dir));
    let layout = ProjectLayout::with_build_dir(&options.project_dir, build_dir);

    let mut runner = LocalGoalRunner::new(
        layout,
        descriptor.asset_id.clone(),
        descriptor.version.clone(),
        &options.switches,
        StructuralEngine::new(),
    )
    .with_dependencies_dir(options.dependencies_dir.clone());
    let goals = run_lifecycle(&build, options.until, &mut runner)?;
    info!(
        project = %descriptor.coordinates(),
        goals = goals.len(),
        until = %options.until,
        "build finished"
    );

    Ok(BuildResult {
        coordinates: descriptor.coordinates(),
        classifier: descriptor.classifier(),
        until: options.until,
        build_dir: runner.layout.build_dir.clone(),
        applied: resolution.applied,
        goals,
        full_api: runner.full_api,
        validation: runner.validation,
        report_path: runner.report_path,
        package: runner.package,
    })
}

/// Normalize a directory of dependency archives into `dest`.
pub fn run_normalize(source: &Path, dest: &Path) -> Result<NormalizeResult> {
    let summary = ArchiveNormalizer::new(source, dest)
        .normalize()
        .with_context(|| format!("normalize {}", source.display()))?;
    Ok(NormalizeResult {
        source: source.to_path_buf(),
        dest: dest.to_path_buf(),
        summary,
    })
}

/// Runs the packager goals in-process.
///
/// `rest-connect` and the invoker's `run` need an external build host and
/// are reported as delegated unless switched off.
pub struct LocalGoalRunner<E> {
    layout: ProjectLayout,
    asset_id: String,
    version: String,
    dependencies_dir: Option<PathBuf>,
    skip_rest_connect: bool,
    validator: SpecValidator<E>,
    full_api: Option<FullApiSummary>,
    validation: Option<ValidationOutcome>,
    report_path: Option<PathBuf>,
    package: Option<PackageSummary>,
}

impl<E: SpecEngine> LocalGoalRunner<E> {
    pub fn new(
        layout: ProjectLayout,
        asset_id: String,
        version: String,
        switches: &BuildSwitches,
        engine: E,
    ) -> Self {
        Self {
            layout,
            asset_id,
            version,
            dependencies_dir: None,
            skip_rest_connect: switches.skip_rest_connect,
            validator: SpecValidator::new(engine, switches),
            full_api: None,
            validation: None,
            report_path: None,
            package: None,
        }
    }

    #[must_use]
    pub fn with_dependencies_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.dependencies_dir = dir;
        self
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    pub fn validation(&self) -> Option<&ValidationOutcome> {
        self.validation.as_ref()
    }

    fn generate_full_api(&mut self) -> Result<GoalStatus> {
        let summary = assemble_full_api(&self.layout, self.dependencies_dir.as_deref())?;
        self.full_api = Some(summary);
        Ok(GoalStatus::Completed)
    }

    fn validate_api(&mut self, binding: &PluginBinding) -> Result<GoalStatus> {
        let classifier = binding_classifier(binding);
        let main = binding.configuration.text("mainFile");
        let outcome = self
            .validator
            .validate(&self.layout.full_api_dir(), &classifier, main);

        let report = match &outcome {
            Ok(ValidationOutcome::Conformed { report, .. }) => Some(report),
            Ok(_) => None,
            Err(error) => error.report(),
        };
        if let Some(report) = report {
            let path = apipack_validate::write_report_json(&self.layout.build_dir, report)?;
            self.report_path = Some(path);
        }

        let outcome = outcome?;
        let status = match outcome {
            ValidationOutcome::Conformed { .. } => GoalStatus::Completed,
            ValidationOutcome::Skipped | ValidationOutcome::NotApplicable(_) => {
                GoalStatus::Skipped
            }
        };
        self.validation = Some(outcome);
        Ok(status)
    }

    fn package(&mut self, binding: &PluginBinding) -> Result<GoalStatus> {
        let classifier = binding_classifier(binding);
        let summary = package_api(
            &self.layout,
            &self.asset_id,
            &self.version,
            classifier.as_str(),
        )?;
        self.package = Some(summary);
        Ok(GoalStatus::Completed)
    }

    fn rest_connect(&self) -> GoalStatus {
        if self.skip_rest_connect {
            info!("ignoring connector generation");
            GoalStatus::Skipped
        } else {
            warn!("connector generation needs an external build host; not run locally");
            GoalStatus::Delegated
        }
    }
}

impl<E: SpecEngine> GoalRunner for LocalGoalRunner<E> {
    fn run_goal(&mut self, binding: &PluginBinding, goal: &str) -> Result<GoalStatus> {
        match goal {
            goals::GENERATE_FULL_API => self.generate_full_api(),
            goals::VALIDATE_API => self.validate_api(binding),
            goals::PACKAGE_API => self.package(binding),
            goals::REST_CONNECT => Ok(self.rest_connect()),
            goals::RUN => {
                if binding.configuration.text("skipInvocation") == Some("true") {
                    Ok(GoalStatus::Skipped)
                } else {
                    Ok(GoalStatus::Delegated)
                }
            }
            other => bail!("unknown goal {other} for plugin {}", binding.plugin),
        }
    }
}

fn binding_classifier(binding: &PluginBinding) -> Classifier {
    Classifier::parse(binding.configuration.text("classifier").unwrap_or_default())
}
