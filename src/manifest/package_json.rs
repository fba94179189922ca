//! package.json parser
//!
//! Handles:
//! - dependencies (production)
//! - devDependencies (development)

use crate::domain::DependencyEntry;
use crate::error::ManifestError;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;

/// Parse dependency entries from package.json content
///
/// `path` is only used for error messages. Entries whose value is not a
/// string are skipped.
pub fn parse_package_json(
    content: &str,
    path: &Path,
) -> Result<Vec<DependencyEntry>, ManifestError> {
    let json: Value = serde_json::from_str(content)
        .map_err(|e| ManifestError::json_parse_error(path, e.to_string()))?;

    let mut entries = Vec::new();

    if let Some(deps) = json.get("dependencies").and_then(|v| v.as_object()) {
        collect_entries(deps, false, &mut entries);
    }

    if let Some(deps) = json.get("devDependencies").and_then(|v| v.as_object()) {
        collect_entries(deps, true, &mut entries);
    }

    Ok(entries)
}

fn collect_entries(deps: &Map<String, Value>, is_dev: bool, entries: &mut Vec<DependencyEntry>) {
    for (name, value) in deps {
        match value.as_str() {
            Some(range) => entries.push(DependencyEntry::new(name, range, is_dev)),
            None => debug!(package = %name, "skipping dependency with non-string version"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<Vec<DependencyEntry>, ManifestError> {
        parse_package_json(content, Path::new("package.json"))
    }

    #[test]
    fn test_parse_dependencies_and_dev_dependencies() {
        let content = r#"{
            "name": "my-app",
            "dependencies": {
                "@angular/core": "^17.3.0",
                "rxjs": "~7.8.0"
            },
            "devDependencies": {
                "typescript": "5.4.5"
            }
        }"#;

        let entries = parse(content).unwrap();

        assert_eq!(entries.len(), 3);
        assert!(entries.contains(&DependencyEntry::production("@angular/core", "^17.3.0")));
        assert!(entries.contains(&DependencyEntry::production("rxjs", "~7.8.0")));
        assert!(entries.contains(&DependencyEntry::development("typescript", "5.4.5")));
    }

    #[test]
    fn test_parse_ignores_other_sections() {
        let content = r#"{
            "peerDependencies": {"react": "^18.0.0"},
            "optionalDependencies": {"fsevents": "^2.3.0"}
        }"#;
        assert!(parse(content).unwrap().is_empty());
    }

    #[test]
    fn test_parse_skips_non_string_versions() {
        let content = r#"{"dependencies": {"weird": {"version": "1.0.0"}, "ok": "1.0.0"}}"#;
        let entries = parse(content).unwrap();
        assert_eq!(entries, vec![DependencyEntry::production("ok", "1.0.0")]);
    }

    #[test]
    fn test_parse_keeps_non_semver_ranges() {
        let content = r#"{"dependencies": {"local": "file:../local", "any": "*"}}"#;
        let entries = parse(content).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.current_version().is_none()));
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse("{ not json");
        assert!(matches!(result, Err(ManifestError::JsonParseError { .. })));
    }
}
