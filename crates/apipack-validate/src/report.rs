//! JSON validation report output.

use std::fs;
use std::path::{Path, PathBuf};

use apipack_model::layout::VALIDATION_REPORT_FILE;
use apipack_model::{SpecIssue, SpecReport};
use chrono::Utc;
use serde::Serialize;

use crate::error::{Result, ValidateError};

const REPORT_SCHEMA: &str = "apipack.validation-report";
const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
pub struct ValidationReportPayload<'a> {
    pub schema: &'static str,
    pub schema_version: u32,
    pub generated_at: String,
    pub location: &'a str,
    pub profile: &'a str,
    pub conforms: bool,
    pub violation_count: usize,
    pub warning_count: usize,
    pub issues: &'a [SpecIssue],
}

/// Write `report` to `<output_dir>/validation_report.json`.
pub fn write_report_json(output_dir: &Path, report: &SpecReport) -> Result<PathBuf> {
    fs::create_dir_all(output_dir).map_err(|source| ValidateError::WriteReport {
        path: output_dir.to_path_buf(),
        source,
    })?;
    let output_path = output_dir.join(VALIDATION_REPORT_FILE);
    let payload = ValidationReportPayload {
        schema: REPORT_SCHEMA,
        schema_version: REPORT_SCHEMA_VERSION,
        generated_at: Utc::now().to_rfc3339(),
        location: &report.location,
        profile: &report.profile,
        conforms: report.conforms,
        violation_count: report.violation_count(),
        warning_count: report.warning_count(),
        issues: &report.issues,
    };
    let json = serde_json::to_string_pretty(&payload)?;
    fs::write(&output_path, format!("{json}\n")).map_err(|source| ValidateError::WriteReport {
        path: output_path.clone(),
        source,
    })?;
    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_report_json() {
        let dir = TempDir::new().unwrap();
        let report = SpecReport::new(
            "api.raml",
            "RAML 1.0",
            vec![SpecIssue::violation("API title is required").at("api.raml")],
        );
        let path = write_report_json(dir.path(), &report).unwrap();
        assert_eq!(path, dir.path().join("validation_report.json"));

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["schema"], "apipack.validation-report");
        assert_eq!(value["conforms"], false);
        assert_eq!(value["violation_count"], 1);
        assert_eq!(value["issues"][0]["severity"], "violation");
        assert_eq!(value["issues"][0]["location"], "api.raml");
        assert!(value["generated_at"].as_str().is_some());
    }
}
