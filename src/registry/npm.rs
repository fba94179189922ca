//! npm Registry adapter
//!
//! Fetches package metadata and per-version manifests from the npm registry.
//! API endpoints:
//! - https://registry.npmjs.org/{package}
//! - https://registry.npmjs.org/{package}/{version}

use crate::error::RegistryError;
use crate::registry::{HttpClient, PackageMetadata, RegistryClient, VersionManifest};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// npm registry base URL
pub const NPM_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// npm Registry adapter
pub struct NpmRegistry {
    client: HttpClient,
    base_url: String,
}

/// npm package document (packument)
#[derive(Debug, Deserialize)]
struct NpmPackageResponse {
    #[serde(default)]
    name: String,
    #[serde(rename = "dist-tags", default)]
    dist_tags: HashMap<String, String>,
    #[serde(default)]
    versions: HashMap<String, Value>,
    /// Publish times, plus the `created`/`modified` bookkeeping keys
    #[serde(default)]
    time: HashMap<String, String>,
    #[serde(default)]
    homepage: Option<String>,
    #[serde(default)]
    repository: Option<Value>,
}

/// npm single-version document
#[derive(Debug, Deserialize)]
struct NpmVersionResponse {
    #[serde(default)]
    version: String,
    #[serde(rename = "peerDependencies", default)]
    peer_dependencies: BTreeMap<String, String>,
    #[serde(default)]
    keywords: Option<Value>,
    #[serde(default)]
    description: Option<String>,
}

impl NpmRegistry {
    /// Create a new npm adapter against the public registry
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, NPM_REGISTRY_URL)
    }

    /// Create a new npm adapter against a custom registry URL
    pub fn with_base_url(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build the packument URL (scoped names are encoded: @scope/name -> @scope%2Fname)
    fn package_url(&self, package: &str) -> String {
        let encoded = if package.starts_with('@') {
            package.replace('/', "%2F")
        } else {
            package.to_string()
        };
        format!("{}/{}", self.base_url, encoded)
    }

    /// Build the single-version URL
    fn version_url(&self, package: &str, version: &str) -> String {
        format!("{}/{}/{}", self.base_url, package, version)
    }
}

/// `repository` is either a string or `{ "type": "git", "url": "..." }`
fn repository_url(repository: Option<&Value>) -> Option<String> {
    let url = match repository? {
        Value::String(s) => s.as_str(),
        Value::Object(map) => map.get("url")?.as_str()?,
        _ => return None,
    };
    let url = url.strip_prefix("git+").unwrap_or(url);
    let url = url.strip_suffix(".git").unwrap_or(url);
    Some(url.to_string())
}

/// `keywords` is usually an array, occasionally a comma/space separated string
fn keyword_list(keywords: Option<&Value>) -> Vec<String> {
    match keywords {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|k| k.as_str())
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) => s
            .split([',', ' '])
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

#[async_trait]
impl RegistryClient for NpmRegistry {
    fn registry_name(&self) -> &'static str {
        "npm"
    }

    async fn package_metadata(&self, package: &str) -> Result<PackageMetadata, RegistryError> {
        let url = self.package_url(package);
        debug!(package, url = %url, "fetching package metadata");
        let response: NpmPackageResponse = self
            .client
            .get_json(&url, package, self.registry_name())
            .await?;

        let versions: Vec<String> = response.versions.into_keys().collect();

        let mut published = BTreeMap::new();
        for version in &versions {
            if let Some(time_str) = response.time.get(version) {
                if let Ok(released_at) = time_str.parse::<DateTime<Utc>>() {
                    published.insert(version.clone(), released_at);
                }
            }
        }

        let name = if response.name.is_empty() {
            package.to_string()
        } else {
            response.name
        };

        Ok(PackageMetadata {
            name,
            latest_version: response.dist_tags.get("latest").cloned(),
            versions,
            homepage: response.homepage.filter(|h| !h.is_empty()),
            repository_url: repository_url(response.repository.as_ref()),
            published,
        })
    }

    async fn version_manifest(
        &self,
        package: &str,
        version: &str,
    ) -> Result<VersionManifest, RegistryError> {
        let url = self.version_url(package, version);
        let response: NpmVersionResponse = self
            .client
            .get_json(&url, package, self.registry_name())
            .await?;

        Ok(VersionManifest {
            version: if response.version.is_empty() {
                version.to_string()
            } else {
                response.version
            },
            peer_dependencies: response.peer_dependencies,
            keywords: keyword_list(response.keywords.as_ref()),
            description: response.description,
        })
    }
}
