//! Error types for specification validation.

use std::fmt;
use std::path::PathBuf;

use apipack_model::SpecReport;
use thiserror::Error;

/// Step of a validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationState {
    Sniffing,
    Parsing,
    Validating,
}

impl fmt::Display for ValidationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sniffing => f.write_str("sniffing"),
            Self::Parsing => f.write_str("parsing"),
            Self::Validating => f.write_str("validating"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ValidateError {
    // === Configuration Errors ===
    #[error("no 'main' property in exchange.json; set it to the entry specification file")]
    MissingMain,

    #[error(
        "The specified 'main' property '{main}' can not be found. Please review your exchange.json"
    )]
    MainNotFound { main: String, path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Specification Errors ===
    #[error("{} does not parse as {}: {} violation(s)", .0.location, .0.profile, .0.violation_count())]
    Parse(SpecReport),

    #[error("{} does not conform to {}: {} violation(s)", .0.location, .0.profile, .0.violation_count())]
    Conformance(SpecReport),

    /// The engine failed to run.
    #[error("Internal error while validating ({state}): {message}")]
    Internal {
        state: ValidationState,
        message: String,
    },

    // === Report Output ===
    #[error("failed to write validation report {path}: {source}")]
    WriteReport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize validation report: {0}")]
    SerializeReport(#[from] serde_json::Error),
}

impl ValidateError {
    /// Step the pass failed in; `None` for report output errors.
    pub fn state(&self) -> Option<ValidationState> {
        match self {
            Self::MissingMain | Self::MainNotFound { .. } | Self::Read { .. } => {
                Some(ValidationState::Sniffing)
            }
            Self::Parse(_) => Some(ValidationState::Parsing),
            Self::Conformance(_) => Some(ValidationState::Validating),
            Self::Internal { state, .. } => Some(*state),
            Self::WriteReport { .. } | Self::SerializeReport(_) => None,
        }
    }

    /// Engine report behind a parse or conformance failure.
    pub fn report(&self) -> Option<&SpecReport> {
        match self {
            Self::Parse(report) | Self::Conformance(report) => Some(report),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ValidateError>;
