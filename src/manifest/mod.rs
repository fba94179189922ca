//! Project manifest reading
//!
//! This module provides functionality to:
//! - Locate package.json from a directory or file path
//! - Parse production and development dependencies
//! - Apply exclusion rules before dependencies are checked

mod filter;
mod package_json;

pub use filter::ExclusionRules;
pub use package_json::parse_package_json;

use crate::domain::DependencyEntry;
use crate::error::ManifestError;
use std::path::{Path, PathBuf};

/// Manifest file name
pub const MANIFEST_FILENAME: &str = "package.json";

/// Resolve a directory or file path to the manifest file
pub fn manifest_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(MANIFEST_FILENAME)
    } else {
        path.to_path_buf()
    }
}

/// Directory containing the manifest (used for config discovery)
pub fn project_dir(path: &Path) -> PathBuf {
    if path.is_dir() {
        return path.to_path_buf();
    }
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Read dependency entries from a project
///
/// `path` may be the project directory or the package.json itself.
pub fn read_manifest(path: &Path) -> Result<Vec<DependencyEntry>, ManifestError> {
    let manifest = manifest_path(path);
    if !manifest.is_file() {
        return Err(ManifestError::not_found(manifest));
    }

    let content = std::fs::read_to_string(&manifest)
        .map_err(|e| ManifestError::read_error(&manifest, e))?;
    parse_package_json(&content, &manifest)
}
