//! Compatibility classification against the target framework major
//!
//! This module provides:
//! - Formal classification: does `<major>.0.0` satisfy a declared peer range
//! - Heuristic classification for versions without a peer requirement
//! - `RegistryProbe`, which fetches a version manifest and classifies it

mod heuristic;

pub use heuristic::{DefaultVerdict, HeuristicPolicy};

use crate::domain::{CompatibilityVerdict, Probe};
use crate::registry::{with_deadline, PackageMetadata, RegistryClient, VersionManifest};
use crate::scan::VersionProbe;
use crate::version::{VersionRange, VersionRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use semver::Version;
use std::time::Duration;
use tracing::{debug, warn};

/// Classifies package versions against one framework major
#[derive(Debug, Clone)]
pub struct Classifier {
    target: Version,
    framework_package: String,
    include_prerelease: bool,
    policy: HeuristicPolicy,
    now: DateTime<Utc>,
}

impl Classifier {
    /// Create a classifier for the given target major and framework package
    pub fn new(
        target_major: u64,
        framework_package: impl Into<String>,
        include_prerelease: bool,
        policy: HeuristicPolicy,
    ) -> Self {
        Self {
            target: Version::new(target_major, 0, 0),
            framework_package: framework_package.into(),
            include_prerelease,
            policy,
            now: Utc::now(),
        }
    }

    /// Pin the clock used for recency checks
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Classify a declared peer range
    pub fn classify_formal(&self, range: &str) -> CompatibilityVerdict {
        match VersionRange::parse(range) {
            Ok(parsed) if parsed.satisfies(&self.target, self.include_prerelease) => {
                CompatibilityVerdict::compatible(format!("{} satisfies {}", self.target, range))
            }
            Ok(_) => CompatibilityVerdict::incompatible(format!(
                "{} does not satisfy {}",
                self.target, range
            )),
            Err(e) => {
                debug!(range, error = %e, "unparsable peer range");
                CompatibilityVerdict::unknown("unparsable peer range")
            }
        }
    }

    /// Classify one version manifest
    ///
    /// Returns the declared peer range alongside the verdict; the range is
    /// `None` when the version carries no formal requirement.
    pub fn classify(
        &self,
        name: &str,
        manifest: &VersionManifest,
        metadata: &PackageMetadata,
    ) -> (Option<String>, CompatibilityVerdict) {
        match manifest.peer_requirement(&self.framework_package) {
            Some(range) => (Some(range.to_string()), self.classify_formal(range)),
            None => (
                None,
                self.policy.classify(name, manifest, metadata, self.now),
            ),
        }
    }
}

/// Probes versions of one package through the registry
pub struct RegistryProbe<'a> {
    package: &'a str,
    registry: &'a dyn RegistryClient,
    classifier: &'a Classifier,
    metadata: &'a PackageMetadata,
    deadline: Duration,
}

impl<'a> RegistryProbe<'a> {
    pub fn new(
        package: &'a str,
        registry: &'a dyn RegistryClient,
        classifier: &'a Classifier,
        metadata: &'a PackageMetadata,
        deadline: Duration,
    ) -> Self {
        Self {
            package,
            registry,
            classifier,
            metadata,
            deadline,
        }
    }
}

#[async_trait]
impl<'a> VersionProbe for RegistryProbe<'a> {
    async fn probe(&self, version: &VersionRecord) -> Probe {
        let request = self.registry.version_manifest(self.package, &version.raw);
        let manifest = with_deadline(
            self.deadline,
            self.package,
            self.registry.registry_name(),
            request,
        )
        .await;

        match manifest {
            Ok(manifest) => {
                let (peer_range, verdict) =
                    self.classifier
                        .classify(self.package, &manifest, self.metadata);
                debug!(
                    package = self.package,
                    version = %version,
                    peer_range = peer_range.as_deref().unwrap_or("-"),
                    verdict = %verdict,
                    "probed version"
                );
                Probe::new(version.clone(), peer_range, verdict)
            }
            Err(e) => {
                warn!(package = self.package, version = %version, error = %e, "peer query failed");
                Probe::new(
                    version.clone(),
                    None,
                    CompatibilityVerdict::unknown("check failed"),
                )
            }
        }
    }
}
