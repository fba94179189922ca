//! Version history scanner
//!
//! Walks a package's versions newest first, probing each one for its peer
//! requirement, and decides when enough has been seen:
//! - Fast mode probes only the newest `F` versions
//! - Early exit stops as soon as an unconstrained package shows a compatible version
//! - Extension keeps going past the fast limit to locate the pinned version
//!   of a formally constrained package

use crate::domain::{CompatibilityResult, Probe};
use crate::version::VersionRecord;
use async_trait::async_trait;
use semver::Version;
use tracing::debug;

/// Classifies a single version of the package being scanned
#[async_trait]
pub trait VersionProbe: Send + Sync {
    /// Probe one version; failures are reported through the verdict
    async fn probe(&self, version: &VersionRecord) -> Probe;
}

/// Scan mode flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Probe only the newest N versions (None or 0 disables)
    pub fast_limit: Option<usize>,
    /// Never stop early
    pub exhaustive: bool,
}

impl ScanOptions {
    /// Number of candidates for a history of `len` versions
    fn candidate_limit(&self, len: usize) -> usize {
        match self.fast_limit {
            Some(limit) if limit > 0 => limit.min(len),
            _ => len,
        }
    }
}

/// Adaptive version history scanner
#[derive(Debug, Clone, Copy, Default)]
pub struct Scanner {
    options: ScanOptions,
}

/// Incremental state built while probing
#[derive(Default)]
struct ScanState {
    has_formal: bool,
    current_found: bool,
    any_compatible: bool,
    probes: Vec<Probe>,
}

impl ScanState {
    fn record(&mut self, probe: Probe, current: Option<&Version>) {
        self.has_formal |= probe.is_formal();
        self.any_compatible |= probe.verdict.is_compatible();
        if current == Some(&probe.version.version) {
            self.current_found = true;
        }
        self.probes.push(probe);
    }

    fn should_exit_early(&self) -> bool {
        !self.has_formal && self.any_compatible
    }

    fn finish(self) -> CompatibilityResult {
        let has_formal = self.has_formal;

        // Once any version is formally constrained, only formal verdicts bracket the window
        let compatible_versions: Vec<VersionRecord> = self
            .probes
            .iter()
            .filter(|p| p.verdict.is_compatible() && (!has_formal || p.is_formal()))
            .map(|p| p.version.clone())
            .collect();

        let latest_compatible = compatible_versions.first().cloned();
        let earliest_compatible = if has_formal {
            compatible_versions.last().cloned()
        } else {
            None
        };

        CompatibilityResult {
            has_formal_peer_requirement: has_formal,
            earliest_compatible,
            latest_compatible,
            declared_peer_range: self.probes.iter().find_map(|p| p.peer_range.clone()),
            current_version_found: self.current_found,
            compatible_versions,
            probes: self.probes,
        }
    }
}

impl Scanner {
    /// Create a scanner with the given mode flags
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Scan a newest-first version list
    ///
    /// `current` is the version the project pins; it drives the extension
    /// rule and is ignored when unknown.
    pub async fn scan(
        &self,
        versions: &[VersionRecord],
        current: Option<&Version>,
        prober: &dyn VersionProbe,
    ) -> CompatibilityResult {
        let limit = self.options.candidate_limit(versions.len());
        let mut state = ScanState::default();
        let mut next = 0;

        while next < limit {
            state.record(prober.probe(&versions[next]).await, current);
            next += 1;

            if !self.options.exhaustive && state.should_exit_early() {
                debug!(probed = next, "no peer requirement, stopping at first compatible version");
                break;
            }
        }

        let needs_extension =
            next == limit && limit < versions.len() && state.has_formal && !state.current_found;

        if needs_extension && current.is_some() {
            debug!(
                from = next,
                remaining = versions.len() - next,
                "current version outside fast window, extending scan"
            );
            while next < versions.len() && !state.current_found {
                state.record(prober.probe(&versions[next]).await, current);
                next += 1;
            }
        }

        state.finish()
    }
}
