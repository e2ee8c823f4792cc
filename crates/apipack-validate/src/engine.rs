//! The specification engine port.

use std::path::{Path, PathBuf};

use apipack_model::SpecReport;
use thiserror::Error;

use crate::dialect::Dialect;
use crate::loader::ResourceLoader;

/// A parsed specification and everything it pulled in.
#[derive(Debug, Clone)]
pub struct ParsedUnit {
    /// Entry document.
    pub location: PathBuf,
    /// Dialect the engine actually parsed, which drives validation.
    pub source_dialect: Dialect,
    /// First non-blank line of the entry, e.g. `#%RAML 1.0 Library`.
    pub header: Option<String>,
    /// Every document loaded while parsing, entry first.
    pub documents: Vec<PathBuf>,
    /// Document tree of the entry file.
    pub model: serde_yaml::Value,
}

/// Failures reported by an engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The document was read but does not conform.
    #[error("{} reported {} violation(s) for {}", .0.profile, .0.violation_count(), .0.location)]
    Rejected(SpecReport),

    /// The engine failed to run (interrupted, crashed, unavailable).
    #[error("{0}")]
    Internal(String),
}

/// Parser and validator for API specifications.
///
/// Calls block until the engine finishes. Engines wrapping asynchronous
/// implementations wait for completion and report interruption or execution
/// failures as [`EngineError::Internal`].
pub trait SpecEngine {
    /// Parse `entry` as `dialect`, resolving references through `loader`.
    fn parse(
        &self,
        dialect: Dialect,
        entry: &Path,
        loader: &ResourceLoader,
    ) -> Result<ParsedUnit, EngineError>;

    /// Validate a parsed unit against the profile of `dialect`.
    ///
    /// Returns the (conforming) report on success; it may carry warnings.
    fn validate(&self, dialect: Dialect, unit: &ParsedUnit) -> Result<SpecReport, EngineError>;
}

impl<E: SpecEngine + ?Sized> SpecEngine for &E {
    fn parse(
        &self,
        dialect: Dialect,
        entry: &Path,
        loader: &ResourceLoader,
    ) -> Result<ParsedUnit, EngineError> {
        (**self).parse(dialect, entry, loader)
    }

    fn validate(&self, dialect: Dialect, unit: &ParsedUnit) -> Result<SpecReport, EngineError> {
        (**self).validate(dialect, unit)
    }
}
