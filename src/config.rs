//! Engine configuration and the optional `peercheck.toml` file
//!
//! Precedence: CLI flags > config file > built-in defaults.

use crate::classify::HeuristicPolicy;
use crate::error::ConfigError;
use crate::scan::ScanOptions;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Default target framework major
pub const DEFAULT_TARGET_MAJOR: u64 = 20;

/// Default framework core package
pub const DEFAULT_FRAMEWORK_PACKAGE: &str = "@angular/core";

/// Default number of concurrent workers
pub const DEFAULT_JOBS: usize = 8;

/// Default per-call registry deadline
pub const DEFAULT_REGISTRY_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest accepted `heuristics.recent_window_days` (about a century)
pub const MAX_RECENT_WINDOW_DAYS: i64 = 36_500;

/// Config file looked up in the project directory
pub const CONFIG_FILE_NAME: &str = "peercheck.toml";

/// Everything the engine needs to classify a project
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Framework major every package is checked against
    pub target_major: u64,
    /// Framework core package whose peer range is inspected
    pub framework_package: String,
    /// Probe only the newest N versions
    pub fast_limit: Option<usize>,
    /// Disable early exit
    pub exhaustive: bool,
    /// Consider pre-release versions
    pub include_prerelease: bool,
    /// Concurrent workers
    pub jobs: usize,
    /// Deadline for each registry call
    pub registry_timeout: Duration,
    /// Signals used for versions without a peer requirement
    pub heuristics: HeuristicPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_major: DEFAULT_TARGET_MAJOR,
            framework_package: DEFAULT_FRAMEWORK_PACKAGE.to_string(),
            fast_limit: None,
            exhaustive: false,
            include_prerelease: false,
            jobs: DEFAULT_JOBS,
            registry_timeout: DEFAULT_REGISTRY_TIMEOUT,
            heuristics: HeuristicPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Scanner flags derived from this configuration
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            fast_limit: self.fast_limit.filter(|limit| *limit > 0),
            exhaustive: self.exhaustive,
        }
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jobs == 0 {
            return Err(ConfigError::invalid_value("jobs", "must be at least 1"));
        }
        if self.registry_timeout.is_zero() {
            return Err(ConfigError::invalid_value("timeout", "must be greater than 0"));
        }
        if self.framework_package.trim().is_empty() {
            return Err(ConfigError::invalid_value("framework", "must not be empty"));
        }
        if self.heuristics.recent_window_days < 0 {
            return Err(ConfigError::invalid_value(
                "heuristics.recent_window_days",
                "must not be negative",
            ));
        }
        if self.heuristics.recent_window_days > MAX_RECENT_WINDOW_DAYS {
            return Err(ConfigError::invalid_value(
                "heuristics.recent_window_days",
                format!("must be at most {}", MAX_RECENT_WINDOW_DAYS),
            ));
        }
        Ok(())
    }
}

/// `[exclusions]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExclusionSection {
    /// Additional namespace prefixes to skip (e.g. `@internal/`)
    pub namespaces: Vec<String>,
    /// Names re-admitted even when a deny rule matches
    pub allow: Vec<String>,
}

/// `[registry]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistrySection {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Contents of `peercheck.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub heuristics: HeuristicPolicy,
    pub exclusions: ExclusionSection,
    /// Package name -> migration guide URL
    pub migration: BTreeMap<String, String>,
    pub registry: RegistrySection,
}

impl FileConfig {
    /// Parse a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content, path)
    }

    /// Parse config file content; `path` is used for error messages
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Resolve the config file for a project
    ///
    /// An explicit path must exist. Otherwise `peercheck.toml` next to the
    /// manifest is used when present, and defaults apply when it is not.
    pub fn discover(project_dir: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidate: PathBuf = project_dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            debug!(path = %candidate.display(), "loading config file");
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Registry deadline from the file, if set
    pub fn registry_timeout(&self) -> Option<Duration> {
        self.registry.timeout_secs.map(Duration::from_secs)
    }
}
