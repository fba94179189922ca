//! Compatibility verdicts and the per-package compatibility aggregate

use crate::version::VersionRecord;
use semver::Version;
use serde::Serialize;
use std::fmt;

/// Classification of one (package, version) pair against the target major
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "reason", rename_all = "snake_case")]
pub enum CompatibilityVerdict {
    /// The version works with the target framework major
    Compatible(String),
    /// The version does not work with the target framework major
    Incompatible(String),
    /// The check itself failed; never counted as compatible
    Unknown(String),
}

impl CompatibilityVerdict {
    /// Creates a compatible verdict
    pub fn compatible(reason: impl Into<String>) -> Self {
        CompatibilityVerdict::Compatible(reason.into())
    }

    /// Creates an incompatible verdict
    pub fn incompatible(reason: impl Into<String>) -> Self {
        CompatibilityVerdict::Incompatible(reason.into())
    }

    /// Creates an unknown verdict
    pub fn unknown(reason: impl Into<String>) -> Self {
        CompatibilityVerdict::Unknown(reason.into())
    }

    /// Returns true if this verdict is compatible
    pub fn is_compatible(&self) -> bool {
        matches!(self, CompatibilityVerdict::Compatible(_))
    }

    /// The reason recorded with this verdict
    pub fn reason(&self) -> &str {
        match self {
            CompatibilityVerdict::Compatible(r)
            | CompatibilityVerdict::Incompatible(r)
            | CompatibilityVerdict::Unknown(r) => r,
        }
    }
}

impl fmt::Display for CompatibilityVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompatibilityVerdict::Compatible(r) => write!(f, "compatible ({})", r),
            CompatibilityVerdict::Incompatible(r) => write!(f, "incompatible ({})", r),
            CompatibilityVerdict::Unknown(r) => write!(f, "unknown ({})", r),
        }
    }
}

/// Outcome of probing a single version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Probe {
    /// The probed version
    pub version: VersionRecord,
    /// Declared peer range against the framework, if any
    pub peer_range: Option<String>,
    /// Classification of this version
    pub verdict: CompatibilityVerdict,
}

impl Probe {
    /// Creates a new probe outcome
    pub fn new(
        version: VersionRecord,
        peer_range: Option<String>,
        verdict: CompatibilityVerdict,
    ) -> Self {
        Self {
            version,
            peer_range,
            verdict,
        }
    }

    /// Returns true if this version declares a formal peer requirement
    pub fn is_formal(&self) -> bool {
        self.peer_range.is_some()
    }
}

/// Per-package compatibility aggregate, finalized when scanning stops
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompatibilityResult {
    /// Whether any probed version declared a formal peer requirement
    pub has_formal_peer_requirement: bool,
    /// Oldest compatible version (formal requirement only)
    pub earliest_compatible: Option<VersionRecord>,
    /// Newest compatible version
    pub latest_compatible: Option<VersionRecord>,
    /// Peer range declared by the newest formally constrained probe
    pub declared_peer_range: Option<String>,
    /// Whether the project's current version was among the probed versions
    pub current_version_found: bool,
    /// Every version classified compatible, newest first
    pub compatible_versions: Vec<VersionRecord>,
    /// Every probe in the order it ran
    pub probes: Vec<Probe>,
}

impl CompatibilityResult {
    /// Returns true if the given version was classified compatible
    pub fn is_compatible(&self, version: &Version) -> bool {
        self.compatible_versions
            .iter()
            .any(|r| &r.version == version)
    }

    /// Number of versions probed
    pub fn probed_count(&self) -> usize {
        self.probes.len()
    }

    /// Returns true if the formally compatible versions form one unbroken
    /// run in probe order
    ///
    /// The earliest/latest bracket is only meaningful when this holds.
    pub fn is_contiguous(&self) -> bool {
        let mut runs = 0;
        let mut in_run = false;
        for probe in self.probes.iter().filter(|p| p.is_formal()) {
            let compatible = probe.verdict.is_compatible();
            if compatible && !in_run {
                runs += 1;
            }
            in_run = compatible;
        }
        runs <= 1
    }
}
