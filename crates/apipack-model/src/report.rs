use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Violation,
    Warning,
    Info,
}

impl IssueSeverity {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Violation => "Violation",
            Self::Warning => "Warning",
            Self::Info => "Info",
        }
    }
}

/// A single finding reported by a specification engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecIssue {
    pub severity: IssueSeverity,
    /// Human-readable message describing the issue.
    pub message: String,
    /// File (and optionally position) the issue points at.
    pub location: Option<String>,
}

impl SpecIssue {
    pub fn violation(message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Violation,
            message: message.into(),
            location: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Warning,
            message: message.into(),
            location: None,
        }
    }

    #[must_use]
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// Parse or validation report for one specification document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecReport {
    /// Document the report is about.
    pub location: String,
    /// Profile (dialect) the document was checked against.
    pub profile: String,
    pub conforms: bool,
    pub issues: Vec<SpecIssue>,
}

impl SpecReport {
    /// Build a report; conformance is derived from the absence of violations.
    pub fn new(
        location: impl Into<String>,
        profile: impl Into<String>,
        issues: Vec<SpecIssue>,
    ) -> Self {
        let conforms = !issues
            .iter()
            .any(|issue| issue.severity == IssueSeverity::Violation);
        Self {
            location: location.into(),
            profile: profile.into(),
            conforms,
            issues,
        }
    }

    pub fn violation_count(&self) -> usize {
        self.count(IssueSeverity::Violation)
    }

    pub fn warning_count(&self) -> usize {
        self.count(IssueSeverity::Warning)
    }

    fn count(&self, severity: IssueSeverity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .count()
    }
}

impl fmt::Display for SpecReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model: {}", self.location)?;
        writeln!(f, "Profile: {}", self.profile)?;
        writeln!(f, "Conforms: {}", self.conforms)?;
        write!(f, "Number of results: {}", self.issues.len())?;
        for severity in [
            IssueSeverity::Violation,
            IssueSeverity::Warning,
            IssueSeverity::Info,
        ] {
            let mut issues = self
                .issues
                .iter()
                .filter(|issue| issue.severity == severity)
                .peekable();
            if issues.peek().is_none() {
                continue;
            }
            write!(f, "\n\nLevel: {}\n", severity.label())?;
            for issue in issues {
                write!(f, "\n- {}", issue.message)?;
                if let Some(location) = &issue.location {
                    write!(f, "\n  Location: {location}")?;
                }
            }
        }
        Ok(())
    }
}
