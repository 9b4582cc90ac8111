//! Notebook discovery and `kernel-metadata.json` lookup.

use crate::error::MetadataError;
use serde::Deserialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// File that marks a directory under the notebooks root as a Kaggle kernel.
pub const METADATA_FILE: &str = "kernel-metadata.json";

/// The part of `kernel-metadata.json` this tool reads.
///
/// Every other field Kaggle puts in the file is ignored whatever its type.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct KernelMetadata {
    #[serde(default)]
    pub id: Option<String>,
}

/// Directory of a notebook project.
pub fn notebook_dir(notebooks_dir: &Path, name: &str) -> PathBuf {
    notebooks_dir.join(name)
}

/// Path to a notebook's metadata file.
pub fn metadata_path(notebooks_dir: &Path, name: &str) -> PathBuf {
    notebook_dir(notebooks_dir, name).join(METADATA_FILE)
}

/// List notebook names under `notebooks_dir` that carry a metadata file.
///
/// Returns an empty list if the root does not exist or cannot be read.
/// Names are sorted so hints are stable between runs.
pub fn available_notebooks(notebooks_dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(notebooks_dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("cannot scan {}: {}", notebooks_dir.display(), e);
            return Vec::new();
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir() && entry.path().join(METADATA_FILE).exists())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();

    names.sort();
    names
}

/// Read and parse a notebook's metadata file.
pub fn load_metadata(notebooks_dir: &Path, name: &str) -> Result<KernelMetadata, MetadataError> {
    let path = metadata_path(notebooks_dir, name);
    if !path.exists() {
        return Err(MetadataError::NotFound(path));
    }

    let content = fs::read_to_string(&path).map_err(|source| MetadataError::Io {
        path: path.clone(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| MetadataError::Malformed { path, source })
}

/// Load the remote slug (the metadata "id") for a notebook.
pub fn load_slug(notebooks_dir: &Path, name: &str) -> Result<String, MetadataError> {
    let metadata = load_metadata(notebooks_dir, name)?;
    match metadata.id {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(MetadataError::MissingId(metadata_path(notebooks_dir, name))),
    }
}

/// Resolve a notebook's slug, writing a diagnostic to `out` when the
/// metadata file exists but cannot be read or parsed.
///
/// Any failure is reported to the caller as `None`.
pub fn resolve_slug<W: Write>(
    notebooks_dir: &Path,
    name: &str,
    out: &mut W,
) -> io::Result<Option<String>> {
    match load_slug(notebooks_dir, name) {
        Ok(slug) => Ok(Some(slug)),
        Err(e) => {
            if e.is_reportable() {
                writeln!(out, "Error reading metadata: {}", e)?;
            }
            log::debug!("slug resolution failed for {}: {}", name, e);
            Ok(None)
        }
    }
}

/// Public page of a hosted kernel.
pub fn kernel_url(slug: &str) -> String {
    format!("https://www.kaggle.com/code/{}", slug)
}
