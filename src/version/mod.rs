//! Semantic version handling
//!
//! This module provides:
//! - npm range parsing and satisfaction
//! - Ordered, validated version history for a package
//! - Loose version extraction from declared manifest ranges

mod history;
mod range;

pub use history::{VersionHistory, VersionRecord};
pub use range::VersionRange;

use regex::Regex;
use semver::Version;
use std::sync::LazyLock;

/// First version literal inside a declared range (`^5.1.0` -> `5.1.0`)
static VERSION_LITERAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)(?:\.(\d+))?(?:\.(\d+))?(?:-([0-9A-Za-z.-]+))?").unwrap()
});

/// Extract the pinned/base version from a declared dependency range
///
/// Returns None for ranges without a version literal such as `*`,
/// `latest` or git/file specifiers.
pub fn current_version_from_range(declared: &str) -> Option<Version> {
    let declared = declared.trim();
    if declared.contains(':') || declared.contains('/') {
        return None;
    }

    let caps = VERSION_LITERAL_RE.captures(declared)?;
    let major = caps.get(1)?.as_str();
    let minor = caps.get(2).map_or("0", |m| m.as_str());
    let patch = caps.get(3).map_or("0", |m| m.as_str());
    let literal = match caps.get(4) {
        Some(pre) if caps.get(3).is_some() => format!("{}.{}.{}-{}", major, minor, patch, pre.as_str()),
        _ => format!("{}.{}.{}", major, minor, patch),
    };
    Version::parse(&literal).ok()
}
