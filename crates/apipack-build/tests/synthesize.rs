//! Build descriptor synthesis and rendering.

use apipack_build::{render_plan, render_pom, synthesize, write_pom};
use apipack_model::{
    BuildSwitches, ConfigValue, DependencyRef, Phase, ProjectDescriptor, RAML_FRAGMENT,
};
use tempfile::TempDir;

fn project(classifier: Option<&str>) -> ProjectDescriptor {
    let mut dependency = DependencyRef::new("acme", "order-types", "1.2.0");
    dependency.classifier = Some("raml-library".to_string());
    dependency.packaging = Some("jar".to_string());
    ProjectDescriptor {
        main: Some("orders.raml".to_string()),
        name: Some("Orders API".to_string()),
        classifier: classifier.map(str::to_string),
        group_id: "acme".to_string(),
        asset_id: "orders-api".to_string(),
        version: "1.0.0".to_string(),
        dependencies: vec![dependency],
        ..ProjectDescriptor::default()
    }
}

#[test]
fn fragment_has_no_install_or_deploy_bindings() {
    let build = synthesize(&project(Some(RAML_FRAGMENT)), &BuildSwitches::default());
    assert_eq!(build.build.plugins.len(), 3);
    assert!(!build.has_phase(Phase::Install));
    assert!(!build.has_phase(Phase::Deploy));
}

#[test]
fn other_classifiers_get_exactly_install_and_deploy() {
    for classifier in [None, Some("raml"), Some("oas"), Some("http")] {
        let build = synthesize(&project(classifier), &BuildSwitches::default());
        assert_eq!(build.bindings_for(Phase::Install).count(), 1);
        assert_eq!(build.bindings_for(Phase::Deploy).count(), 1);
        assert_eq!(build.build.plugins.len(), 5);
    }
}

#[test]
fn dependencies_are_forced_to_fragment_zips() {
    let build = synthesize(&project(None), &BuildSwitches::default());
    let dependency = &build.dependencies[0];
    assert_eq!(dependency.group_id, "acme");
    assert_eq!(dependency.artifact_id, "order-types");
    assert_eq!(dependency.version, "1.2.0");
    assert_eq!(dependency.classifier, "raml-fragment");
    assert_eq!(dependency.kind, "zip");
}

#[test]
fn identity_and_directories() {
    let build = synthesize(&project(None), &BuildSwitches::default());
    assert_eq!(build.model_version, "4.0.0");
    assert_eq!(build.group_id, "acme");
    assert_eq!(build.artifact_id, "orders-api");
    assert_eq!(build.name.as_deref(), Some("Orders API"));
    assert_eq!(build.repositories.len(), 1);
    assert_eq!(build.repositories[0].id, "anypoint-exchange-v2");
    assert_eq!(
        build.build.directory,
        "${project.basedir}/.exchange_modules_tmp/target"
    );
    assert_eq!(build.build.source_directory, "${project.basedir}");
}

#[test]
fn invoker_configuration() {
    let build = synthesize(&project(None), &BuildSwitches::default());
    let deploy = build.bindings_for(Phase::Deploy).next().unwrap();
    assert_eq!(deploy.plugin.to_string(), "org.apache.maven.plugins:maven-invoker-plugin:3.2.0");
    assert_eq!(deploy.goals, vec!["run"]);
    let config = &deploy.configuration;
    assert_eq!(config.text("goals"), Some("deploy"));
    assert_eq!(
        config.text("pom"),
        Some("${project.basedir}/.exchange_modules_tmp/target/rest-connect/pom.xml")
    );
    assert_eq!(config.text("skipInvocation"), Some("false"));
    let properties = config.nested("properties").unwrap();
    assert_eq!(properties.text("skipDocumentation"), Some("true"));
    assert_eq!(
        properties.text("mule.maven.extension.model.disable"),
        Some("true")
    );
    assert!(matches!(config.get("properties"), Some(ConfigValue::Nested(_))));
}

#[test]
fn lifecycle_plan() {
    let build = synthesize(&project(Some("raml")), &BuildSwitches::default());
    insta::assert_snapshot!(render_plan(&build), @r"
    generate-sources:
      generate-full-api (exchange_api_packager) -> generate-full-api
    compile:
      validate-api (exchange_api_packager) -> validate-api
    package:
      generate-artifacts (exchange_api_packager) -> package-api, rest-connect
    install:
      rest-connect-install (maven-invoker-plugin) -> run
    deploy:
      rest-connect-deploy (maven-invoker-plugin) -> run
    ");
}

#[test]
fn pom_groups_packager_executions() {
    let build = synthesize(&project(Some("raml")), &BuildSwitches::default());
    let pom = render_pom(&build).unwrap();

    assert!(pom.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(pom.contains("<modelVersion>4.0.0</modelVersion>"));
    assert!(pom.contains("<artifactId>orders-api</artifactId>"));
    assert!(pom.contains("<classifier>raml-fragment</classifier>"));
    assert!(pom.contains("<type>zip</type>"));
    assert!(pom.contains("<url>https://maven.anypoint.mulesoft.com/api/v2/maven</url>"));
    assert!(pom.contains("<directory>${project.basedir}/.exchange_modules_tmp/target</directory>"));

    // One packager plugin with three executions, one invoker plugin with two.
    assert_eq!(pom.matches("<plugin>").count(), 2);
    assert_eq!(pom.matches("<execution>").count(), 5);
    assert_eq!(pom.matches("<mainFile>orders.raml</mainFile>").count(), 1);
    assert_eq!(pom.matches("<skipInvocation>false</skipInvocation>").count(), 2);

    let validate = pom.find("<id>validate-api</id>").unwrap();
    let artifacts = pom.find("<id>generate-artifacts</id>").unwrap();
    let install = pom.find("<id>rest-connect-install</id>").unwrap();
    assert!(validate < artifacts && artifacts < install);
}

#[test]
fn pom_is_written_to_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out/pom.xml");
    let build = synthesize(&project(Some(RAML_FRAGMENT)), &BuildSwitches::default());
    write_pom(&path, &build).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, render_pom(&build).unwrap());
    assert!(!written.contains("maven-invoker-plugin"));
}
