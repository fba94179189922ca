//! npm registry access
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - The `RegistryClient` seam the engine queries through
//! - npm Registry adapter

mod client;
mod npm;

pub use client::HttpClient;
pub use npm::{NpmRegistry, NPM_REGISTRY_URL};

use crate::error::RegistryError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

/// Package-level metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackageMetadata {
    /// Package name
    pub name: String,
    /// Version tagged `latest`
    pub latest_version: Option<String>,
    /// Every published version string, unordered and unvalidated
    pub versions: Vec<String>,
    /// Project homepage
    pub homepage: Option<String>,
    /// Source repository URL
    pub repository_url: Option<String>,
    /// Publish time per version
    pub published: BTreeMap<String, DateTime<Utc>>,
}

impl PackageMetadata {
    /// Returns true if any version was published at or after `cutoff`
    pub fn has_release_since(&self, cutoff: DateTime<Utc>) -> bool {
        self.published.values().any(|t| *t >= cutoff)
    }
}

/// Manifest of one published version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VersionManifest {
    /// The version this manifest describes
    pub version: String,
    /// Declared peer dependencies (peer name -> range)
    pub peer_dependencies: BTreeMap<String, String>,
    /// Package keywords
    pub keywords: Vec<String>,
    /// Package description
    pub description: Option<String>,
}

impl VersionManifest {
    /// The range this version declares against the given peer, if any
    pub fn peer_requirement(&self, peer: &str) -> Option<&str> {
        self.peer_dependencies.get(peer).map(String::as_str)
    }
}

/// Query contract for a package registry
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Get the registry name
    fn registry_name(&self) -> &'static str;

    /// Fetch package-level metadata (latest version, version list, links)
    async fn package_metadata(&self, package: &str) -> Result<PackageMetadata, RegistryError>;

    /// Fetch the manifest of one version, including its peer requirements
    async fn version_manifest(
        &self,
        package: &str,
        version: &str,
    ) -> Result<VersionManifest, RegistryError>;
}

/// Run a registry request under a deadline
///
/// Expiry is reported as `RegistryError::Timeout` so a hung call never
/// stalls its worker.
pub async fn with_deadline<T, F>(
    deadline: Duration,
    package: &str,
    registry: &str,
    request: F,
) -> Result<T, RegistryError>
where
    F: Future<Output = Result<T, RegistryError>>,
{
    match tokio::time::timeout(deadline, request).await {
        Ok(result) => result,
        Err(_) => Err(RegistryError::timeout(package, registry)),
    }
}
