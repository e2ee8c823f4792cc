//! Specification dialect detection from file content.

use std::fmt;

use apipack_model::Classifier;
use serde::{Deserialize, Serialize};

/// Specification family declared by the project classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecFamily {
    Raml,
    Oas,
}

impl SpecFamily {
    /// Family validated for `classifier`, `None` for classifiers outside the
    /// recognized specification families.
    pub fn from_classifier(classifier: &Classifier) -> Option<Self> {
        match classifier {
            Classifier::Raml | Classifier::RamlFragment => Some(Self::Raml),
            Classifier::Oas => Some(Self::Oas),
            Classifier::Other(_) => None,
        }
    }
}

impl fmt::Display for SpecFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raml => f.write_str("RAML"),
            Self::Oas => f.write_str("OAS"),
        }
    }
}

/// Concrete specification dialect and version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    Raml08,
    Raml10,
    Oas20,
    Oas30,
}

impl Dialect {
    pub const fn family(&self) -> SpecFamily {
        match self {
            Self::Raml08 | Self::Raml10 => SpecFamily::Raml,
            Self::Oas20 | Self::Oas30 => SpecFamily::Oas,
        }
    }

    /// Profile name used in reports.
    pub const fn profile_name(&self) -> &'static str {
        match self {
            Self::Raml08 => "RAML 0.8",
            Self::Raml10 => "RAML 1.0",
            Self::Oas20 => "OAS 2.0",
            Self::Oas30 => "OAS 3.0",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.profile_name())
    }
}

const RAML_HEADER: &str = "#%RAML";
const RAML_08_HEADER: &str = "#%RAML 0.8";

/// Pick the dialect of `content` within the declared `family`.
///
/// RAML: the first non-blank line decides between 0.8 and 1.0. OAS: any line
/// declaring `swagger: 2.0` selects 2.0, everything else is treated as 3.x.
pub fn sniff(family: SpecFamily, content: &str) -> Dialect {
    match family {
        SpecFamily::Raml => sniff_raml(content),
        SpecFamily::Oas => sniff_oas(content),
    }
}

fn sniff_raml(content: &str) -> Dialect {
    let first = content
        .lines()
        .map(|line| line.trim_start_matches('\u{feff}').trim())
        .find(|line| !line.is_empty());
    match first {
        Some(line) if starts_with_ignore_case(line, RAML_08_HEADER) => Dialect::Raml08,
        _ => Dialect::Raml10,
    }
}

fn sniff_oas(content: &str) -> Dialect {
    if content.lines().any(declares_swagger_2) {
        Dialect::Oas20
    } else {
        Dialect::Oas30
    }
}

/// Detect the dialect from content alone, `None` when it has no recognizable
/// header or version key.
pub fn detect(content: &str) -> Option<Dialect> {
    let first = content
        .lines()
        .map(|line| line.trim_start_matches('\u{feff}').trim())
        .find(|line| !line.is_empty())?;
    if starts_with_ignore_case(first, RAML_HEADER) {
        return Some(sniff_raml(content));
    }
    if content.lines().any(declares_swagger_2) {
        return Some(Dialect::Oas20);
    }
    if content.lines().any(declares_openapi) {
        return Some(Dialect::Oas30);
    }
    None
}

fn declares_swagger_2(line: &str) -> bool {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.contains("\"swagger\":\"2.0\"") {
        return true;
    }
    key_value(line).is_some_and(|(key, value)| key == "swagger" && value == "2.0")
}

fn declares_openapi(line: &str) -> bool {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    compact.contains("\"openapi\":\"3") || key_value(line).is_some_and(|(key, _)| key == "openapi")
}

/// Split a `key: value` line, stripping quotes and a trailing comma.
fn key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.trim().split_once(':')?;
    let key = unquote(key.trim());
    let value = unquote(value.trim().trim_end_matches(',').trim());
    Some((key, value))
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

fn starts_with_ignore_case(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
