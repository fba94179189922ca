//! Dependency entries read from the project manifest

use crate::version::current_version_from_range;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One dependency declared in the project manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEntry {
    /// Package name
    pub name: String,
    /// Version range as declared in the manifest (e.g. `^5.1.0`)
    pub declared_range: String,
    /// Whether this is a development dependency
    pub is_dev: bool,
}

impl DependencyEntry {
    /// Creates a new dependency entry
    pub fn new(name: impl Into<String>, declared_range: impl Into<String>, is_dev: bool) -> Self {
        Self {
            name: name.into(),
            declared_range: declared_range.into(),
            is_dev,
        }
    }

    /// Creates a new production dependency
    pub fn production(name: impl Into<String>, declared_range: impl Into<String>) -> Self {
        Self::new(name, declared_range, false)
    }

    /// Creates a new development dependency
    pub fn development(name: impl Into<String>, declared_range: impl Into<String>) -> Self {
        Self::new(name, declared_range, true)
    }

    /// The version the project currently pins, if the declared range names one
    pub fn current_version(&self) -> Option<Version> {
        current_version_from_range(&self.declared_range)
    }
}

impl fmt::Display for DependencyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dev_marker = if self.is_dev { " (dev)" } else { "" };
        write!(f, "{}@{}{}", self.name, self.declared_range, dev_marker)
    }
}
