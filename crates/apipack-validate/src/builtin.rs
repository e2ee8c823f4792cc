//! Built-in structural engine.
//!
//! Checks what can be checked without a full specification model: the
//! document header, YAML/JSON well-formedness, that every referenced file
//! exists below the API root, and the top-level keys each dialect requires.

use std::collections::{BTreeSet, VecDeque};
use std::path::{Path, PathBuf};

use apipack_model::{SpecIssue, SpecReport};
use serde_yaml::Value;
use tracing::{debug, trace};

use crate::dialect::{Dialect, SpecFamily, detect};
use crate::engine::{EngineError, ParsedUnit, SpecEngine};
use crate::loader::ResourceLoader;

const INCLUDE_TAG: &str = "!include";
const RAML_USES: &str = "uses";
const OAS_REF: &str = "$ref";

/// Extensions of referenced documents that are parsed and followed.
const STRUCTURED_EXTENSIONS: &[&str] = &["raml", "yaml", "yml", "json"];

#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralEngine;

impl StructuralEngine {
    pub fn new() -> Self {
        Self
    }
}

impl SpecEngine for StructuralEngine {
    fn parse(
        &self,
        dialect: Dialect,
        entry: &Path,
        loader: &ResourceLoader,
    ) -> Result<ParsedUnit, EngineError> {
        let location = loader.display_path(entry);
        let content = loader.read(entry).map_err(|error| {
            EngineError::Internal(format!("failed to read {}: {error}", entry.display()))
        })?;
        let header = first_line(&content);

        let source_dialect = match detect(&content) {
            Some(found) if found.family() == dialect.family() => found,
            Some(found) => {
                return Err(reject(
                    &location,
                    dialect,
                    vec![SpecIssue::violation(format!(
                        "document is {found} but the project is classified as {}",
                        dialect.family()
                    ))
                    .at(location.clone())],
                ));
            }
            None if dialect.family() == SpecFamily::Raml => {
                return Err(reject(
                    &location,
                    dialect,
                    vec![SpecIssue::violation("missing `#%RAML` header").at(location.clone())],
                ));
            }
            None => dialect,
        };

        let model = serde_yaml::from_str::<Value>(&content).map_err(|error| {
            let issue = SpecIssue::violation(format!("invalid document: {error}"));
            reject(&location, source_dialect, vec![issue.at(location.clone())])
        })?;

        let mut issues = Vec::new();
        let documents = follow_references(
            source_dialect.family(),
            entry,
            &model,
            loader,
            &mut issues,
        );
        if !issues.is_empty() {
            return Err(reject(&location, source_dialect, issues));
        }

        debug!(
            entry = %location,
            dialect = %source_dialect,
            documents = documents.len(),
            "parsed"
        );
        Ok(ParsedUnit {
            location: entry.to_path_buf(),
            source_dialect,
            header,
            documents,
            model,
        })
    }

    fn validate(&self, dialect: Dialect, unit: &ParsedUnit) -> Result<SpecReport, EngineError> {
        let location = unit.location.display().to_string();
        let issues = match dialect.family() {
            SpecFamily::Raml => check_raml(unit),
            SpecFamily::Oas => check_oas(dialect, unit),
        };
        let report = SpecReport::new(location, dialect.profile_name(), issues);
        if report.conforms {
            Ok(report)
        } else {
            Err(EngineError::Rejected(report))
        }
    }
}

fn reject(location: &str, dialect: Dialect, issues: Vec<SpecIssue>) -> EngineError {
    EngineError::Rejected(SpecReport::new(location, dialect.profile_name(), issues))
}

fn first_line(content: &str) -> Option<String> {
    content
        .lines()
        .map(|line| line.trim_start_matches('\u{feff}').trim())
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

/// Load every document reachable from the entry; unresolved references are
/// reported as violations. Returns the loaded documents, entry first.
fn follow_references(
    family: SpecFamily,
    entry: &Path,
    model: &Value,
    loader: &ResourceLoader,
    issues: &mut Vec<SpecIssue>,
) -> Vec<PathBuf> {
    let mut documents = vec![entry.to_path_buf()];
    let mut seen: BTreeSet<PathBuf> = documents.iter().cloned().collect();
    let mut queue = VecDeque::from([(entry.to_path_buf(), model.clone())]);

    while let Some((document, value)) = queue.pop_front() {
        let mut references = Vec::new();
        collect_references(family, &value, true, &mut references);
        let origin = loader.display_path(&document);

        for reference in references {
            let Some(path) = loader.resolve(&reference, &document) else {
                issues.push(
                    SpecIssue::violation(format!("reference '{reference}' leaves the API root"))
                        .at(origin.clone()),
                );
                continue;
            };
            if !path.is_file() {
                issues.push(
                    SpecIssue::violation(format!("unresolved reference '{reference}'"))
                        .at(origin.clone()),
                );
                continue;
            }
            if !seen.insert(path.clone()) {
                continue;
            }
            trace!(from = %origin, to = %path.display(), "following reference");
            documents.push(path.clone());
            if !is_structured(&path) {
                continue;
            }
            let parsed = loader
                .read(&path)
                .map_err(|error| error.to_string())
                .and_then(|content| {
                    serde_yaml::from_str::<Value>(&content).map_err(|error| error.to_string())
                });
            match parsed {
                Ok(value) => queue.push_back((path, value)),
                Err(error) => issues.push(
                    SpecIssue::violation(format!("invalid document: {error}"))
                        .at(loader.display_path(&path)),
                ),
            }
        }
    }
    documents
}

fn is_structured(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| STRUCTURED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

fn collect_references(family: SpecFamily, value: &Value, top_level: bool, out: &mut Vec<String>) {
    match value {
        Value::Tagged(tagged) => {
            if family == SpecFamily::Raml && tagged.tag == INCLUDE_TAG {
                if let Some(reference) = tagged.value.as_str() {
                    out.push(reference.trim().to_string());
                }
            } else {
                collect_references(family, &tagged.value, false, out);
            }
        }
        Value::Mapping(mapping) => {
            for (key, child) in mapping {
                match (family, key.as_str()) {
                    (SpecFamily::Raml, Some(RAML_USES)) if top_level => {
                        if let Some(libraries) = child.as_mapping() {
                            out.extend(
                                libraries
                                    .values()
                                    .filter_map(Value::as_str)
                                    .map(|path| path.trim().to_string()),
                            );
                        }
                    }
                    (SpecFamily::Oas, Some(OAS_REF)) => {
                        if let Some(reference) = child.as_str().and_then(external_ref) {
                            out.push(reference);
                        }
                    }
                    _ => collect_references(family, child, false, out),
                }
            }
        }
        Value::Sequence(items) => {
            for item in items {
                collect_references(family, item, false, out);
            }
        }
        _ => {}
    }
}

/// File part of an OAS `$ref`, `None` for local and remote references.
fn external_ref(reference: &str) -> Option<String> {
    let file = reference.split('#').next().unwrap_or_default().trim();
    if file.is_empty() || file.contains("://") {
        return None;
    }
    Some(file.to_string())
}

fn check_raml(unit: &ParsedUnit) -> Vec<SpecIssue> {
    let location = unit.location.display().to_string();
    let mut issues = Vec::new();
    if is_raml_fragment(unit.header.as_deref()) {
        return issues;
    }
    let Some(root) = unit.model.as_mapping() else {
        issues.push(SpecIssue::violation("API definition must be a mapping").at(location));
        return issues;
    };
    match root.get("title") {
        Some(title) if title.as_str().is_some_and(|text| !text.trim().is_empty()) => {}
        Some(_) => issues.push(
            SpecIssue::violation("API title must be a non-empty string").at(location.clone()),
        ),
        None => issues.push(SpecIssue::violation("API title is required").at(location.clone())),
    }
    let has_resources = root
        .keys()
        .filter_map(Value::as_str)
        .any(|key| key.starts_with('/'));
    if !has_resources {
        issues.push(SpecIssue::warning("API defines no resources").at(location));
    }
    issues
}

/// True for RAML documents whose header names a fragment kind
/// (`#%RAML 1.0 Library`, `#%RAML 1.0 DataType`, ...).
fn is_raml_fragment(header: Option<&str>) -> bool {
    header.is_some_and(|line| line.split_whitespace().count() > 2)
}

fn check_oas(dialect: Dialect, unit: &ParsedUnit) -> Vec<SpecIssue> {
    let location = unit.location.display().to_string();
    let mut issues = Vec::new();
    let Some(root) = unit.model.as_mapping() else {
        issues.push(SpecIssue::violation("API definition must be an object").at(location));
        return issues;
    };
    let version_key = match dialect {
        Dialect::Oas20 => "swagger",
        _ => "openapi",
    };
    if !root.contains_key(version_key) {
        issues.push(
            SpecIssue::violation(format!("`{version_key}` is required")).at(location.clone()),
        );
    }
    match root.get("info").and_then(Value::as_mapping) {
        Some(info) => {
            for field in ["title", "version"] {
                if !info.contains_key(field) {
                    issues.push(
                        SpecIssue::violation(format!("`info.{field}` is required"))
                            .at(location.clone()),
                    );
                }
            }
        }
        None => issues.push(SpecIssue::violation("`info` is required").at(location.clone())),
    }
    if !root.contains_key("paths") {
        issues.push(SpecIssue::violation("`paths` is required").at(location));
    }
    issues
}
