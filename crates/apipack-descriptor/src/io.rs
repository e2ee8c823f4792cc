//! Descriptor file reading and writing.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use apipack_model::ProjectDescriptor;

use crate::error::{DescriptorError, Result};

/// Read and parse the descriptor at `path`.
pub fn read_descriptor(path: &Path) -> Result<ProjectDescriptor> {
    if !path.is_file() {
        return Err(DescriptorError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path).map_err(|source| DescriptorError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_descriptor(&content, path)
}

/// Parse descriptor JSON; `path` is only used for error context.
pub fn parse_descriptor(content: &str, path: &Path) -> Result<ProjectDescriptor> {
    serde_json::from_str(content).map_err(|source| DescriptorError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Render a descriptor the way it is stored on disk.
pub fn render_descriptor(descriptor: &ProjectDescriptor) -> serde_json::Result<String> {
    let json = serde_json::to_string_pretty(descriptor)?;
    Ok(format!("{json}\n"))
}

/// Write `descriptor` to `path`, replacing the existing file.
///
/// The content goes to `<path>.tmp` first and is renamed over `path`, so a
/// failed write leaves the original descriptor intact.
pub fn write_descriptor(path: &Path, descriptor: &ProjectDescriptor) -> Result<()> {
    let content = render_descriptor(descriptor).map_err(|source| DescriptorError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    let temp_path = temp_path(path);
    let write_error = |source| DescriptorError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::create(&temp_path).map_err(write_error)?;
    file.write_all(content.as_bytes()).map_err(write_error)?;
    file.sync_all().map_err(write_error)?;
    fs::rename(&temp_path, path).map_err(write_error)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
