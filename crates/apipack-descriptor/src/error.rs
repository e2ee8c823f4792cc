//! Error types for descriptor loading and resolution.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or resolving a project descriptor.
#[derive(Debug, Error)]
pub enum DescriptorError {
    // === File System Errors ===
    /// Descriptor file not found.
    #[error("descriptor not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read the descriptor.
    #[error("failed to read descriptor {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to rewrite the descriptor after applying defaults.
    #[error("failed to write descriptor {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Format Errors ===
    /// Descriptor is not valid JSON or has the wrong shape.
    #[error("invalid descriptor {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Descriptor could not be rendered back to JSON.
    #[error("failed to serialize descriptor {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // === Configuration Errors ===
    /// No group id could be established from any source.
    #[error(
        "no `groupId` for {path}: add `groupId` to the descriptor, pass --group-id \
         (or set APIPACK_GROUP_ID), or define `orgId` in .apivcs/config.properties"
    )]
    MissingGroupId { path: PathBuf },

    /// Neither `assetId` nor `name` is set.
    #[error("no `assetId` for {path}: add `assetId` or `name` to the descriptor")]
    MissingAssetId { path: PathBuf },
}

/// Result type alias for descriptor operations.
pub type Result<T> = std::result::Result<T, DescriptorError>;
