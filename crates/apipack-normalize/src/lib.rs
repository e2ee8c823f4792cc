//! Dependency archive normalization.
//!
//! Downloaded dependency archives are mirrored into a tree of
//! `<dotted-group>/<asset>/<version>/` directories so that specification
//! references like `exchange_modules/acme/types/1.0.0/order.raml` resolve.
//! The crate also assembles the full API tree and the package directory.

pub mod assembly;
pub mod error;
pub mod extract;
pub mod layout;
pub mod sources;
pub mod walk;

pub use assembly::{FullApiSummary, PackageSummary, assemble_full_api, package_api};
pub use error::{NormalizeError, Result};
pub use extract::extract_zip;
pub use layout::{MAX_WALK_STEPS, PathSegments, split_group_segments};
pub use sources::{SourceFilter, copy_tree};
pub use walk::{ArchiveNormalizer, ExtractedArchive, NormalizeSummary};
