//! The validation pass: sniff, parse, validate.

use std::fs;
use std::path::Path;

use apipack_model::{BuildSwitches, Classifier, SpecReport};
use tracing::{debug, error, info, info_span, warn};

use crate::dialect::{Dialect, SpecFamily, sniff};
use crate::engine::{EngineError, SpecEngine};
use crate::error::{Result, ValidateError, ValidationState};
use crate::loader::ResourceLoader;

/// Result of a successful pass.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// Validation is switched off for this build.
    Skipped,
    /// The classifier is not a validated specification family.
    NotApplicable(Classifier),
    Conformed {
        dialect: Dialect,
        /// Documents loaded while parsing, entry included.
        documents: usize,
        report: SpecReport,
    },
}

/// Gate that fails the build on non-conforming specifications.
#[derive(Debug, Clone)]
pub struct SpecValidator<E> {
    engine: E,
    skip: bool,
}

impl<E: SpecEngine> SpecValidator<E> {
    pub fn new(engine: E, switches: &BuildSwitches) -> Self {
        Self {
            engine,
            skip: switches.skip_validation,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Validate the specification `main` inside the self-contained API tree
    /// at `api_root`.
    pub fn validate(
        &self,
        api_root: &Path,
        classifier: &Classifier,
        main: Option<&str>,
    ) -> Result<ValidationOutcome> {
        if self.skip {
            info!("ignoring API validation");
            return Ok(ValidationOutcome::Skipped);
        }
        debug!("pass --skip-validation (or APIPACK_SKIP_VALIDATION=true) to disable API validation");

        let Some(family) = SpecFamily::from_classifier(classifier) else {
            debug!(%classifier, "classifier is not validated");
            return Ok(ValidationOutcome::NotApplicable(classifier.clone()));
        };
        let _span = info_span!("validate", %classifier).entered();

        // Sniffing
        let main = main
            .map(str::trim)
            .filter(|main| !main.is_empty())
            .ok_or(ValidateError::MissingMain)?;
        let entry = api_root.join(main);
        if !entry.is_file() {
            return Err(ValidateError::MainNotFound {
                main: main.to_string(),
                path: entry,
            });
        }
        let content = fs::read_to_string(&entry).map_err(|source| ValidateError::Read {
            path: entry.clone(),
            source,
        })?;
        let dialect = sniff(family, &content);
        debug!(%dialect, entry = %entry.display(), "dialect detected");

        // Parsing
        let loader = ResourceLoader::new(api_root);
        let unit = self
            .engine
            .parse(dialect, &entry, &loader)
            .map_err(|failure| match failure {
                EngineError::Rejected(report) => {
                    error!("{report}");
                    ValidateError::Parse(report)
                }
                EngineError::Internal(message) => ValidateError::Internal {
                    state: ValidationState::Parsing,
                    message,
                },
            })?;

        // Validating, against the dialect the engine actually parsed.
        let report = match self.engine.validate(unit.source_dialect, &unit) {
            Ok(report) if report.conforms => report,
            Ok(report) | Err(EngineError::Rejected(report)) => {
                error!("{report}");
                return Err(ValidateError::Conformance(report));
            }
            Err(EngineError::Internal(message)) => {
                return Err(ValidateError::Internal {
                    state: ValidationState::Validating,
                    message,
                });
            }
        };
        if report.warning_count() > 0 {
            warn!("{report}");
        }
        info!(
            dialect = %unit.source_dialect,
            documents = unit.documents.len(),
            "API conforms"
        );

        Ok(ValidationOutcome::Conformed {
            dialect: unit.source_dialect,
            documents: unit.documents.len(),
            report,
        })
    }
}
