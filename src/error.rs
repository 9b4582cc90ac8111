//! Error types for notebook metadata lookup.

use std::path::PathBuf;
use thiserror::Error;

/// Reasons a notebook's `kernel-metadata.json` could not yield a slug.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("metadata file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Valid JSON, but no usable "id" field.
    #[error("{}: missing \"id\" field", .0.display())]
    MissingId(PathBuf),
}

impl MetadataError {
    /// Whether the failure deserves a printed diagnostic. A missing file or
    /// missing id is the normal "unknown notebook" case and stays quiet.
    pub fn is_reportable(&self) -> bool {
        matches!(self, MetadataError::Io { .. } | MetadataError::Malformed { .. })
    }
}
