//! Ordered version history for a package
//!
//! Registry version lists arrive unordered and may contain strings that are
//! not valid semantic versions. `VersionHistory` validates, optionally drops
//! pre-releases, and sorts newest first.

use semver::Version;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// A single published version of a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionRecord {
    /// The version string as published
    pub raw: String,
    /// The parsed version
    #[serde(skip)]
    pub version: Version,
}

impl VersionRecord {
    /// Parse a published version string, returning None when malformed
    pub fn parse(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let version = Version::parse(raw.trim()).ok()?;
        Some(Self { raw, version })
    }

    /// Returns true if this is a pre-release (alpha, beta, rc, next, ...)
    pub fn is_prerelease(&self) -> bool {
        !self.version.pre.is_empty()
    }
}

impl fmt::Display for VersionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Validated versions of one package, sorted newest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionHistory {
    records: Vec<VersionRecord>,
}

impl VersionHistory {
    /// Build a history from raw registry version strings
    ///
    /// Malformed versions are skipped and never classified. Pre-releases are
    /// kept only when `include_prerelease` is set.
    pub fn from_versions<I, S>(versions: I, include_prerelease: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut records: Vec<VersionRecord> = Vec::new();

        for raw in versions {
            let raw = raw.as_ref();
            let Some(record) = VersionRecord::parse(raw) else {
                debug!(version = raw, "skipping malformed version");
                continue;
            };
            if record.is_prerelease() && !include_prerelease {
                continue;
            }
            records.push(record);
        }

        records.sort_by(|a, b| b.version.cmp(&a.version));
        records.dedup_by(|a, b| a.version == b.version);

        Self { records }
    }

    /// All versions, newest first
    pub fn records(&self) -> &[VersionRecord] {
        &self.records
    }

    /// Number of versions
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if there are no usable versions
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Newest version
    pub fn newest(&self) -> Option<&VersionRecord> {
        self.records.first()
    }
}
