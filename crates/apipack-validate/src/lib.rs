//! Specification validation.
//!
//! A pass runs Sniffing → Parsing → Validating:
//! 1. the entry file's content selects the concrete [`Dialect`],
//! 2. the [`SpecEngine`] parses it, following references through a
//!    [`ResourceLoader`] scoped to the API root,
//! 3. the parsed unit is validated against its own dialect's profile.
//!
//! Any rejection fails the build with the engine report logged.

pub mod builtin;
pub mod dialect;
pub mod engine;
pub mod error;
pub mod loader;
pub mod report;
pub mod validator;

pub use builtin::StructuralEngine;
pub use dialect::{Dialect, SpecFamily, detect, sniff};
pub use engine::{EngineError, ParsedUnit, SpecEngine};
pub use error::{Result, ValidateError, ValidationState};
pub use loader::ResourceLoader;
pub use report::write_report_json;
pub use validator::{SpecValidator, ValidationOutcome};
