//! Project descriptor (`exchange.json`) loading and identity resolution.
//!
//! [`DescriptorResolver`] fills in a missing `assetId`, `version` and
//! `groupId` before any build step runs, and rewrites the descriptor when
//! it had to apply a default.

pub mod error;
pub mod io;
pub mod org_id;
pub mod resolve;

pub use error::{DescriptorError, Result};
pub use io::{parse_descriptor, read_descriptor, render_descriptor, write_descriptor};
pub use org_id::{OrgId, find_org_id};
pub use resolve::{AppliedDefault, DescriptorResolver, GroupIdSource, Resolution, dasherize};
