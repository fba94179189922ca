//! Recommendation engine
//!
//! Turns a finished `CompatibilityResult` into a prioritized action and a
//! version-distance descriptor. Everything here is a pure function.

use crate::domain::{CompatibilityResult, Distance, DistanceComponent, Priority, Recommendation};
use crate::version::VersionRecord;
use semver::Version;
use std::cmp::Ordering;

/// Decide what to do with one dependency
pub fn recommend(
    result: &CompatibilityResult,
    current: Option<&Version>,
    latest: Option<&VersionRecord>,
) -> Recommendation {
    if !result.has_formal_peer_requirement {
        return recommend_unconstrained(current, latest);
    }

    let (Some(earliest), Some(latest_compatible)) =
        (&result.earliest_compatible, &result.latest_compatible)
    else {
        return Recommendation::must(None, "no compatible version for target");
    };

    let Some(current) = current else {
        return Recommendation::new(
            Priority::Unknown,
            Some(latest_compatible.raw.clone()),
            "current version unparsable",
        );
    };

    if result.is_compatible(current) {
        return if *current == latest_compatible.version {
            Recommendation::keep("current version is the latest compatible")
        } else {
            Recommendation::optional(
                latest_compatible.raw.clone(),
                "newer compatible version available",
            )
        };
    }

    let note = match latest {
        Some(latest) if latest.version == latest_compatible.version => {
            "latest release is compatible".to_string()
        }
        Some(latest) if latest_compatible.version < latest.version => {
            format!("newer latest {} is outside the compatible window", latest.raw)
        }
        _ => "upgrade available within target".to_string(),
    };
    Recommendation::must(Some(earliest.raw.clone()), note)
}

fn recommend_unconstrained(
    current: Option<&Version>,
    latest: Option<&VersionRecord>,
) -> Recommendation {
    let Some(latest) = latest else {
        return Recommendation::unknown("no published versions");
    };
    let Some(current) = current else {
        return Recommendation::unknown("current version unparsable");
    };

    match current.cmp(&latest.version) {
        Ordering::Equal => Recommendation::keep("up to date"),
        Ordering::Less => Recommendation::optional(latest.raw.clone(), "newer version available"),
        Ordering::Greater => Recommendation::keep("current version is ahead of latest"),
    }
}

/// The version distance is measured against
///
/// latestCompatible when a formal requirement exists, otherwise latest.
pub fn baseline<'a>(
    result: &'a CompatibilityResult,
    latest: Option<&'a VersionRecord>,
) -> Option<&'a VersionRecord> {
    if result.has_formal_peer_requirement {
        result.latest_compatible.as_ref()
    } else {
        latest
    }
}

/// Describe how far `current` is from `baseline`
///
/// Pre-release and build metadata are ignored; the first differing
/// component decides.
pub fn distance(current: Option<&Version>, baseline: Option<&Version>) -> Distance {
    let Some(baseline) = baseline else {
        return Distance::NoBaseline;
    };
    let Some(current) = current else {
        return Distance::Unparsable;
    };

    let from = (current.major, current.minor, current.patch);
    let to = (baseline.major, baseline.minor, baseline.patch);

    match from.cmp(&to) {
        Ordering::Equal => Distance::Equal,
        Ordering::Greater => Distance::Ahead,
        Ordering::Less => {
            let (component, count) = if to.0 != from.0 {
                (DistanceComponent::Major, to.0 - from.0)
            } else if to.1 != from.1 {
                (DistanceComponent::Minor, to.1 - from.1)
            } else {
                (DistanceComponent::Patch, to.2 - from.2)
            };
            Distance::Behind { component, count }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CompatibilityVerdict, Probe};
    use rstest::rstest;

    fn record(v: &str) -> VersionRecord {
        VersionRecord::parse(v).unwrap()
    }

    fn version(v: &str) -> Version {
        Version::parse(v).unwrap()
    }

    /// Formal result whose compatible window is `compatible` (newest first)
    fn formal(compatible: &[&str]) -> CompatibilityResult {
        let compatible_versions: Vec<VersionRecord> =
            compatible.iter().map(|v| record(v)).collect();
        CompatibilityResult {
            has_formal_peer_requirement: true,
            earliest_compatible: compatible_versions.last().cloned(),
            latest_compatible: compatible_versions.first().cloned(),
            declared_peer_range: Some("^20.0.0".to_string()),
            probes: compatible_versions
                .iter()
                .map(|r| {
                    Probe::new(
                        r.clone(),
                        Some("^20.0.0".to_string()),
                        CompatibilityVerdict::compatible("ok"),
                    )
                })
                .collect(),
            compatible_versions,
            ..Default::default()
        }
    }

    #[test]
    fn test_keep_when_current_is_latest_compatible() {
        let result = formal(&["5.0.0", "4.5.0"]);
        let current = version("5.0.0");
        let latest = record("6.0.0");

        let rec = recommend(&result, Some(&current), Some(&latest));
        assert_eq!(rec.priority, Priority::Keep);

        let base = baseline(&result, Some(&latest)).map(|r| &r.version);
        assert_eq!(distance(Some(&current), base), Distance::Equal);
    }

    #[test]
    fn test_must_upgrade_to_earliest_compatible() {
        let result = formal(&["6.2.0", "6.1.0", "6.0.0"]);
        let current = version("4.0.0");
        let latest = record("6.2.0");

        let rec = recommend(&result, Some(&current), Some(&latest));
        assert_eq!(rec.priority, Priority::MustUpgrade);
        assert_eq!(rec.target_version.as_deref(), Some("6.0.0"));
        assert_eq!(rec.note, "latest release is compatible");
    }

    #[test]
    fn test_must_upgrade_with_newer_incompatible_latest() {
        let result = formal(&["6.2.0", "6.0.0"]);
        let rec = recommend(&result, Some(&version("4.0.0")), Some(&record("7.0.0")));
        assert_eq!(rec.to_string(), "MustUpgrade 6.0.0");
        assert_eq!(rec.note, "newer latest 7.0.0 is outside the compatible window");
    }

    #[test]
    fn test_must_upgrade_without_latest() {
        let result = formal(&["6.0.0"]);
        let rec = recommend(&result, Some(&version("4.0.0")), None);
        assert_eq!(rec.note, "upgrade available within target");
    }

    #[test]
    fn test_optional_upgrade_within_window() {
        let result = formal(&["6.2.0", "6.0.0"]);
        let rec = recommend(&result, Some(&version("6.0.0")), Some(&record("6.2.0")));
        assert_eq!(rec.priority, Priority::OptionalUpgrade);
        assert_eq!(rec.target_version.as_deref(), Some("6.2.0"));
    }

    #[test]
    fn test_no_compatible_version() {
        let result = CompatibilityResult {
            has_formal_peer_requirement: true,
            ..Default::default()
        };
        let rec = recommend(&result, Some(&version("1.0.0")), Some(&record("2.0.0")));
        assert_eq!(rec.priority, Priority::MustUpgrade);
        assert!(rec.target_version.is_none());
        assert_eq!(rec.note, "no compatible version for target");
    }

    #[test]
    fn test_formal_with_unparsable_current() {
        let result = formal(&["6.0.0"]);
        let rec = recommend(&result, None, Some(&record("6.0.0")));
        assert_eq!(rec.priority, Priority::Unknown);
        assert_eq!(rec.target_version.as_deref(), Some("6.0.0"));
    }

    #[rstest]
    #[case("1.2.0", "1.2.0", Priority::Keep)]
    #[case("1.1.0", "1.2.0", Priority::OptionalUpgrade)]
    #[case("2.0.0", "1.2.0", Priority::Keep)]
    fn test_unconstrained(#[case] current: &str, #[case] latest: &str, #[case] expected: Priority) {
        let result = CompatibilityResult::default();
        let rec = recommend(&result, Some(&version(current)), Some(&record(latest)));
        assert_eq!(rec.priority, expected);
    }

    #[test]
    fn test_unconstrained_optional_names_latest() {
        let rec = recommend(
            &CompatibilityResult::default(),
            Some(&version("1.1.0")),
            Some(&record("1.2.0")),
        );
        assert_eq!(rec.target_version.as_deref(), Some("1.2.0"));
    }

    #[test]
    fn test_unconstrained_unknowns() {
        let result = CompatibilityResult::default();
        assert_eq!(
            recommend(&result, None, Some(&record("1.0.0"))).priority,
            Priority::Unknown
        );
        assert_eq!(
            recommend(&result, Some(&version("1.0.0")), None).priority,
            Priority::Unknown
        );
    }

    #[test]
    fn test_baseline_selection() {
        let latest = record("7.0.0");
        let constrained = formal(&["6.0.0"]);
        assert_eq!(baseline(&constrained, Some(&latest)).unwrap().raw, "6.0.0");

        let unconstrained = CompatibilityResult::default();
        assert_eq!(baseline(&unconstrained, Some(&latest)).unwrap().raw, "7.0.0");
    }

    #[rstest]
    #[case("5.0.0", "5.0.0", "equal")]
    #[case("5.1.0", "5.0.0", "ahead")]
    #[case("4.0.0", "5.0.0", "1 major behind")]
    #[case("3.9.9", "5.0.0", "2 majors behind")]
    #[case("5.0.0", "5.1.0", "1 minor behind")]
    #[case("5.0.3", "5.4.0", "4 minors behind")]
    #[case("5.0.0", "5.0.1", "1 patch behind")]
    #[case("5.0.0", "5.0.7", "7 patches behind")]
    #[case("5.0.0-rc.1", "5.0.0", "equal")]
    fn test_distance(#[case] current: &str, #[case] base: &str, #[case] expected: &str) {
        let d = distance(Some(&version(current)), Some(&version(base)));
        assert_eq!(d.to_string(), expected);
    }

    #[test]
    fn test_distance_edge_states() {
        assert_eq!(distance(None, Some(&version("1.0.0"))), Distance::Unparsable);
        assert_eq!(distance(Some(&version("1.0.0")), None), Distance::NoBaseline);
    }
}
