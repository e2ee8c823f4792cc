//! Organization id lookup from `.apivcs/config.properties`.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use apipack_model::layout::{ORG_CONFIG_DIR, ORG_CONFIG_FILE, ORG_ID_KEY};
use tracing::debug;

/// An organization id and the config file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgId {
    pub value: String,
    pub source: PathBuf,
}

/// Find the organization id configured for a project directory.
///
/// Only `<project_dir>/.apivcs/config.properties` is consulted; config files
/// in parent directories are never used. An unreadable file or a blank
/// `orgId` counts as no organization id.
pub fn find_org_id(project_dir: &Path) -> Option<OrgId> {
    let candidate = project_dir.join(ORG_CONFIG_DIR).join(ORG_CONFIG_FILE);
    if !candidate.is_file() {
        return None;
    }
    let properties = match read_properties(&candidate) {
        Ok(properties) => properties,
        Err(error) => {
            debug!(path = %candidate.display(), %error, "skipping unreadable org config");
            return None;
        }
    };
    let Some(value) = properties
        .get(ORG_ID_KEY)
        .filter(|value| !value.is_empty())
    else {
        debug!(path = %candidate.display(), "org config has no {ORG_ID_KEY}");
        return None;
    };
    Some(OrgId {
        value: value.clone(),
        source: candidate,
    })
}

/// Read a flat properties file.
pub fn read_properties(path: &Path) -> io::Result<BTreeMap<String, String>> {
    let content = fs::read_to_string(path)?;
    Ok(parse_properties(&content))
}

/// Parse `key=value` / `key: value` lines, skipping `#` and `!` comments.
pub fn parse_properties(content: &str) -> BTreeMap<String, String> {
    let mut properties = BTreeMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let Some(split) = line.find(['=', ':']) else {
            properties.insert(line.to_string(), String::new());
            continue;
        };
        let key = line[..split].trim();
        let value = line[split + 1..].trim();
        if !key.is_empty() {
            properties.insert(key.to_string(), value.to_string());
        }
    }
    properties
}
