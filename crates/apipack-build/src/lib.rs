//! Build descriptor synthesis.
//!
//! [`synthesize`] turns a resolved project descriptor into the build unit the
//! lifecycle runs: identity, the API repository, the dependency list and the
//! plugin bindings for each phase. [`render_pom`] writes the same unit as a
//! Maven POM for external build hosts.

pub mod plan;
pub mod pom;
pub mod synthesize;

pub use plan::render_plan;
pub use pom::{render_pom, write_pom};
pub use synthesize::{exchange_repository, goals, synthesize};
