//! Local builds of temporary projects.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use apipack_build::synthesize;
use apipack_cli::lifecycle::{GoalRunner, GoalStatus, run_lifecycle};
use apipack_cli::pipeline::{BuildOptions, export_pom, run_build, run_normalize};
use apipack_model::layout::{SCRATCH_DIR, TARGET_DIR, VALIDATION_REPORT_FILE};
use apipack_model::{BuildSwitches, Phase, PluginBinding, ProjectDescriptor};
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const VALID_API: &str = "#%RAML 1.0\ntitle: Orders\nuses:\n  types: exchange_modules/acme/types/1.0.0/types.raml\n/orders:\n  get:\n";
const UNTITLED_API: &str = "#%RAML 1.0\nversion: v1\n/orders:\n  get:\n";

fn write_zip(path: &Path, files: &[(&str, &str)]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut writer = ZipWriter::new(File::create(path).unwrap());
    for (name, content) in files {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}

fn build_dir(project: &Path) -> PathBuf {
    project.join(SCRATCH_DIR).join(TARGET_DIR)
}

/// A project with one `acme:types:1.0.0` dependency already downloaded.
fn project(descriptor: &str, api: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("exchange.json"), descriptor).unwrap();
    fs::write(dir.path().join("api.raml"), api).unwrap();
    write_zip(
        &build_dir(dir.path()).join("dependencies/acme/types/1.0.0/types.zip"),
        &[
            ("types.raml", "#%RAML 1.0 Library\ntypes:\n  Order: !include order.raml\n"),
            ("order.raml", "#%RAML 1.0 DataType\ntype: object\n"),
        ],
    );
    dir
}

fn complete_descriptor(classifier: &str) -> String {
    format!(
        r#"{{"main": "api.raml", "name": "Orders API", "classifier": "{classifier}", "groupId": "acme", "assetId": "orders-api", "version": "2.0.0"}}"#
    )
}

fn statuses(goals: &[apipack_cli::lifecycle::ExecutedGoal]) -> Vec<(String, GoalStatus)> {
    goals
        .iter()
        .map(|goal| (goal.goal.clone(), goal.status))
        .collect()
}

#[test]
fn build_resolves_normalizes_validates_and_packages() {
    let dir = project(r#"{"main": "api.raml", "name": "Orders API"}"#, VALID_API);
    let switches = BuildSwitches::new().with_group_id_override(Some("acme".to_string()));

    let result = run_build(&BuildOptions::new(dir.path()).with_switches(switches)).unwrap();

    assert_eq!(result.coordinates, "acme:orders-api:1.0.0-SNAPSHOT");
    assert_eq!(result.applied.len(), 3);
    let descriptor: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("exchange.json")).unwrap())
            .unwrap();
    assert_eq!(descriptor["groupId"], "acme");
    assert_eq!(descriptor["assetId"], "orders-api");

    assert_eq!(
        statuses(&result.goals),
        vec![
            ("generate-full-api".to_string(), GoalStatus::Completed),
            ("validate-api".to_string(), GoalStatus::Completed),
            ("package-api".to_string(), GoalStatus::Completed),
            ("rest-connect".to_string(), GoalStatus::Delegated),
        ]
    );

    let full_api = result.full_api.as_ref().unwrap();
    assert_eq!(full_api.modules.archive_count(), 1);
    assert!(
        full_api
            .full_api_dir
            .join("exchange_modules/acme/types/1.0.0/order.raml")
            .is_file()
    );

    let package = result.package.as_ref().unwrap();
    assert_eq!(
        package.package_dir,
        build_dir(dir.path()).join("orders-api-1.0.0-SNAPSHOT-raml")
    );
    assert!(package.package_dir.join("api.raml").is_file());
    assert!(package.package_dir.join("exchange.json").is_file());
    assert!(!package.package_dir.join(SCRATCH_DIR).exists());
    assert_eq!(
        result.report_path.as_deref(),
        Some(build_dir(dir.path()).join(VALIDATION_REPORT_FILE).as_path())
    );
}

#[test]
fn failed_validation_stops_before_packaging() {
    let dir = project(&complete_descriptor("raml"), UNTITLED_API);

    let error = run_build(&BuildOptions::new(dir.path())).unwrap_err();

    let message = format!("{error:#}");
    assert!(message.contains("validate-api"), "{message}");
    assert!(!build_dir(dir.path()).join("orders-api-2.0.0-raml").exists());

    let report: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(build_dir(dir.path()).join(VALIDATION_REPORT_FILE)).unwrap(),
    )
    .unwrap();
    assert_eq!(report["conforms"], false);
    assert_eq!(report["issues"][0]["message"], "API title is required");
}

#[test]
fn skip_validation_packages_invalid_specs() {
    let dir = project(&complete_descriptor("raml"), UNTITLED_API);
    let switches = BuildSwitches::new().with_skip_validation(true);

    let result = run_build(&BuildOptions::new(dir.path()).with_switches(switches)).unwrap();

    assert_eq!(result.goals[1].status, GoalStatus::Skipped);
    assert!(result.package.is_some());
    assert!(result.report_path.is_none());
}

#[test]
fn skip_rest_connect_skips_connector_goals() {
    let dir = project(&complete_descriptor("raml"), VALID_API);
    let switches = BuildSwitches::new().with_skip_rest_connect(true);

    let result = run_build(
        &BuildOptions::new(dir.path())
            .with_until(Phase::Deploy)
            .with_switches(switches),
    )
    .unwrap();

    let skipped: Vec<&str> = result
        .goals
        .iter()
        .filter(|goal| goal.status == GoalStatus::Skipped)
        .map(|goal| goal.execution_id.as_str())
        .collect();
    assert_eq!(
        skipped,
        vec!["generate-artifacts", "rest-connect-install", "rest-connect-deploy"]
    );
}

#[test]
fn fragments_have_no_connector_sub_build() {
    let dir = project(
        &complete_descriptor("raml-fragment"),
        "#%RAML 1.0 Library\ntypes:\n  Id: string\n",
    );

    let result = run_build(&BuildOptions::new(dir.path()).with_until(Phase::Deploy)).unwrap();

    assert_eq!(result.goals.len(), 4);
    assert!(result.goals.iter().all(|goal| goal.phase <= Phase::Package));
    assert!(
        result
            .package
            .unwrap()
            .package_dir
            .ends_with("orders-api-2.0.0-raml-fragment")
    );
}

#[test]
fn explicit_build_dir_is_used() {
    let dir = project(&complete_descriptor("raml"), VALID_API);
    let out = TempDir::new().unwrap();
    let dependencies = build_dir(dir.path()).join("dependencies");

    let result = run_build(
        &BuildOptions::new(dir.path())
            .with_until(Phase::Compile)
            .with_build_dir(Some(out.path().to_path_buf()))
            .with_dependencies_dir(Some(dependencies)),
    )
    .unwrap();

    assert_eq!(result.build_dir, out.path());
    assert!(out.path().join("full-api/api.raml").is_file());
    assert!(out.path().join(VALIDATION_REPORT_FILE).is_file());
    assert!(result.package.is_none());
}

#[test]
fn missing_group_id_fails_without_touching_descriptor() {
    let raw = r#"{"main": "api.raml", "name": "Orders API"}"#;
    let dir = project(raw, VALID_API);

    let error = run_build(&BuildOptions::new(dir.path())).unwrap_err();

    assert!(format!("{error:#}").contains("groupId"), "{error:#}");
    assert_eq!(
        fs::read_to_string(dir.path().join("exchange.json")).unwrap(),
        raw
    );
}

#[derive(Default)]
struct FailingCompile {
    calls: Vec<String>,
}

impl GoalRunner for FailingCompile {
    fn run_goal(&mut self, binding: &PluginBinding, goal: &str) -> Result<GoalStatus> {
        self.calls.push(goal.to_string());
        if binding.phase == Phase::Compile {
            bail!("specification rejected");
        }
        Ok(GoalStatus::Completed)
    }
}

#[test]
fn lifecycle_halts_on_first_failure() {
    let descriptor = ProjectDescriptor {
        main: Some("api.raml".to_string()),
        group_id: "acme".to_string(),
        asset_id: "orders".to_string(),
        version: "1.0.0".to_string(),
        ..ProjectDescriptor::default()
    };
    let build = synthesize(&descriptor, &BuildSwitches::default());
    let mut runner = FailingCompile::default();

    let error = run_lifecycle(&build, Phase::Deploy, &mut runner).unwrap_err();

    assert_eq!(runner.calls, vec!["generate-full-api", "validate-api"]);
    assert_eq!(
        error.to_string(),
        "goal validate-api (execution validate-api) failed in phase compile"
    );
    assert_eq!(error.root_cause().to_string(), "specification rejected");
}

#[test]
fn normalize_command_mirrors_archives() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("downloads");
    write_zip(
        &source.join("org/acme/shared/types/1.0.0/types.zip"),
        &[("types.raml", "#%RAML 1.0 Library\n")],
    );

    let result = run_normalize(&source, &dir.path().join("modules")).unwrap();

    assert_eq!(result.summary.repaired_count(), 1);
    assert!(
        dir.path()
            .join("modules/org.acme.shared/types/1.0.0/types.raml")
            .is_file()
    );
}

#[test]
fn executed_goals_follow_lifecycle_order() {
    let dir = project(&complete_descriptor("raml"), VALID_API);

    let result = run_build(&BuildOptions::new(dir.path()).with_until(Phase::Deploy)).unwrap();

    let lines: Vec<String> = result
        .goals
        .iter()
        .map(|goal| {
            format!(
                "{} {} {} {}",
                goal.phase, goal.execution_id, goal.goal, goal.status
            )
        })
        .collect();
    insta::assert_snapshot!(lines.join("\n"), @r"
    generate-sources generate-full-api generate-full-api completed
    compile validate-api validate-api completed
    package generate-artifacts package-api completed
    package generate-artifacts rest-connect delegated
    install rest-connect-install run delegated
    deploy rest-connect-deploy run delegated
    ");
}

#[test]
fn pom_export_creates_parent_directories() {
    let dir = project(&complete_descriptor("raml"), VALID_API);
    let output = dir.path().join("out/nested/pom.xml");

    export_pom(dir.path(), &BuildSwitches::default(), &output).unwrap();

    let pom = fs::read_to_string(&output).unwrap();
    assert!(pom.contains("<artifactId>orders-api</artifactId>"));
    assert!(pom.contains("<goal>validate-api</goal>"));
}

#[test]
fn unwritable_descriptor_stops_the_build() {
    let dir = project(r#"{"main": "api.raml", "name": "Orders API"}"#, VALID_API);
    fs::create_dir(dir.path().join("exchange.json.tmp")).unwrap();
    let switches = BuildSwitches::new().with_group_id_override(Some("acme".to_string()));

    let error = run_build(&BuildOptions::new(dir.path()).with_switches(switches)).unwrap_err();

    assert!(format!("{error:#}").contains("failed to write descriptor"), "{error:#}");
    assert!(!build_dir(dir.path()).join("full-api").exists());
}
