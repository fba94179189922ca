//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: Issues reading or parsing package.json
//! - RegistryError: Issues with npm registry communication
//! - ConfigError: Issues with the configuration file or CLI values
//! - RangeError: Unparseable semantic-version ranges

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Package registry related errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to manifest file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("manifest file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("failed to parse JSON in {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },
}

/// Errors related to package registry communication
///
/// `PackageNotFound`, `NetworkError` and `InvalidResponse` are the three
/// failure kinds callers must be able to tell apart; the rest refine
/// transport failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Package (or package version) not found in registry
    #[error("package '{package}' not found in {registry} registry")]
    PackageNotFound { package: String, registry: String },

    /// Network request failed
    #[error("failed to fetch package '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {registry} registry")]
    RateLimitExceeded { registry: String },

    /// Invalid response from registry
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the configuration file
    #[error("failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// A value is out of range or malformed
    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Error returned when a version range cannot be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid version range '{range}': {message}")]
pub struct RangeError {
    pub range: String,
    pub message: String,
}

impl RangeError {
    /// Creates a new RangeError
    pub fn new(range: impl Into<String>, message: impl Into<String>) -> Self {
        RangeError {
            range: range.into(),
            message: message.into(),
        }
    }
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new JsonParseError
    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl RegistryError {
    /// Creates a new PackageNotFound error
    pub fn not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::InvalidResponse {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Returns true if retrying the request could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RegistryError::RateLimitExceeded { .. }
                | RegistryError::NetworkError { .. }
                | RegistryError::Timeout { .. }
        )
    }
}

impl ConfigError {
    /// Creates a new InvalidValue error
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_error_display() {
        let err = ManifestError::not_found("/path/to/package.json");
        assert_eq!(
            err.to_string(),
            "manifest file not found: /path/to/package.json"
        );

        let err = ManifestError::json_parse_error("package.json", "expected value");
        assert_eq!(
            err.to_string(),
            "failed to parse JSON in package.json: expected value"
        );
    }

    #[test]
    fn test_registry_error_display() {
        let err = RegistryError::not_found("rxjs", "npm");
        assert_eq!(err.to_string(), "package 'rxjs' not found in npm registry");

        let err = RegistryError::network("rxjs", "npm", "connection refused");
        assert_eq!(
            err.to_string(),
            "failed to fetch package 'rxjs' from npm: connection refused"
        );

        let err = RegistryError::timeout("rxjs", "npm");
        assert_eq!(err.to_string(), "timeout while fetching 'rxjs' from npm");
    }

    #[test]
    fn test_registry_error_kinds_are_distinct() {
        let not_found = RegistryError::not_found("a", "npm");
        let network = RegistryError::network("a", "npm", "reset");
        let malformed = RegistryError::invalid_response("a", "npm", "bad json");
        assert_ne!(not_found, network);
        assert_ne!(network, malformed);
        assert_ne!(not_found, malformed);
    }

    #[test]
    fn test_registry_error_is_retryable() {
        assert!(RegistryError::timeout("a", "npm").is_retryable());
        assert!(RegistryError::network("a", "npm", "reset").is_retryable());
        assert!(RegistryError::RateLimitExceeded {
            registry: "npm".to_string()
        }
        .is_retryable());
        assert!(!RegistryError::not_found("a", "npm").is_retryable());
        assert!(!RegistryError::invalid_response("a", "npm", "x").is_retryable());
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::invalid_value("jobs", "must be at least 1");
        assert_eq!(err.to_string(), "invalid value for 'jobs': must be at least 1");
    }

    #[test]
    fn test_range_error_display() {
        let err = RangeError::new(">=foo", "unexpected token");
        assert_eq!(
            err.to_string(),
            "invalid version range '>=foo': unexpected token"
        );
    }

    #[test]
    fn test_app_error_from_registry() {
        let err: AppError = RegistryError::not_found("rxjs", "npm").into();
        assert!(matches!(err, AppError::Registry(_)));
    }
}
