//! Project descriptor (`exchange.json`) types.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Classifier value used for API fragments.
pub const RAML_FRAGMENT: &str = "raml-fragment";

/// Unrecognized descriptor keys, kept in document order.
pub type Extensions = Map<String, Value>;

/// Kind of API asset a project produces.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Classifier {
    /// A complete RAML API specification.
    #[default]
    Raml,
    /// A reusable RAML fragment (library, data type, trait...).
    RamlFragment,
    /// An OpenAPI / Swagger specification.
    Oas,
    /// Any classifier this packager does not validate.
    Other(String),
}

impl Classifier {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "raml" => Self::Raml,
            RAML_FRAGMENT => Self::RamlFragment,
            "oas" => Self::Oas,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Raml => "raml",
            Self::RamlFragment => RAML_FRAGMENT,
            Self::Oas => "oas",
            Self::Other(value) => value,
        }
    }

    pub fn is_fragment(&self) -> bool {
        matches!(self, Self::RamlFragment)
    }

    /// True for the specification families the validator understands.
    pub fn is_specification(&self) -> bool {
        matches!(self, Self::Raml | Self::RamlFragment | Self::Oas)
    }

    /// True for the RAML family (complete APIs and fragments).
    pub fn is_raml(&self) -> bool {
        matches!(self, Self::Raml | Self::RamlFragment)
    }
}

impl fmt::Display for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The declarative unit describing one API project.
///
/// Typed fields cover the identity and entry point of the project. Any other
/// key found in the document lands in [`ProjectDescriptor::extensions`] and is
/// written back untouched when the descriptor is persisted.
///
/// Serialization writes the typed keys first, in field order (`main`, `name`,
/// `classifier`, `groupId`, `assetId`, `version`, `dependencies`), followed by
/// the unknown keys in their original document order. A rewritten
/// `exchange.json` can therefore move unknown keys below the typed ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    #[serde(default)]
    pub group_id: String,
    #[serde(default)]
    pub asset_id: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub dependencies: Vec<DependencyRef>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl ProjectDescriptor {
    /// Declared classifier, `raml` when the descriptor does not name one.
    pub fn classifier(&self) -> Classifier {
        self.classifier
            .as_deref()
            .map(Classifier::parse)
            .unwrap_or_default()
    }

    /// Entry file, ignoring blank values.
    pub fn main_file(&self) -> Option<&str> {
        self.main.as_deref().filter(|main| !main.trim().is_empty())
    }

    /// `groupId:assetId:version` triple used in logs.
    pub fn coordinates(&self) -> String {
        format!("{}:{}:{}", self.group_id, self.asset_id, self.version)
    }
}

/// One transitive API dependency.
///
/// Equality and hashing only consider `groupId`, `assetId`, `version` and the
/// extension map. `scope`, `classifier` and `packaging` are descriptive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyRef {
    pub group_id: String,
    pub asset_id: String,
    pub version: String,
    /// Only present in descriptor format 1.0.0 and later.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packaging: Option<String>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl DependencyRef {
    pub fn new(
        group_id: impl Into<String>,
        asset_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            asset_id: asset_id.into(),
            version: version.into(),
            ..Self::default()
        }
    }
}

impl PartialEq for DependencyRef {
    fn eq(&self, other: &Self) -> bool {
        self.group_id == other.group_id
            && self.asset_id == other.asset_id
            && self.version == other.version
            && self.extensions == other.extensions
    }
}

impl Eq for DependencyRef {}

impl Hash for DependencyRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.group_id.hash(state);
        self.asset_id.hash(state);
        self.version.hash(state);
        // Map equality ignores key order, so only the sorted key set is hashed.
        let mut keys: Vec<&String> = self.extensions.keys().collect();
        keys.sort();
        keys.hash(state);
    }
}

impl fmt::Display for DependencyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.asset_id, self.version)
    }
}
