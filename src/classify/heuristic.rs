//! Signal-based classification for packages without a formal peer requirement

use crate::domain::CompatibilityVerdict;
use crate::registry::{PackageMetadata, VersionManifest};
use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;

/// Verdict applied when no heuristic signal fires
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultVerdict {
    /// Absence of evidence counts as compatible
    #[default]
    AssumeCompatible,
    /// Absence of evidence counts as incompatible
    AssumeIncompatible,
}

/// Named, overridable heuristic rules
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HeuristicPolicy {
    /// Packages known to work with any framework major
    pub agnostic_packages: Vec<String>,
    /// Keywords that mark a package as part of the framework ecosystem
    pub ecosystem_tokens: Vec<String>,
    /// Keywords that mark a package as a generic utility
    pub utility_tokens: Vec<String>,
    /// Namespace of type-definition-only packages
    pub types_namespace: String,
    /// A framework package published within this many days counts as maintained
    pub recent_window_days: i64,
    /// Fallback verdict
    #[serde(rename = "default")]
    pub default_verdict: DefaultVerdict,
}

impl Default for HeuristicPolicy {
    fn default() -> Self {
        let strings = |items: &[&str]| -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        };
        Self {
            agnostic_packages: strings(&[
                "rxjs",
                "tslib",
                "zone.js",
                "typescript",
                "core-js",
                "lodash",
                "lodash-es",
                "date-fns",
                "dayjs",
                "moment",
                "uuid",
                "chart.js",
                "d3",
            ]),
            ecosystem_tokens: strings(&["angular", "ngx", "angular2", "ng2"]),
            utility_tokens: strings(&[
                "util",
                "utils",
                "utility",
                "utilities",
                "helper",
                "helpers",
                "polyfill",
                "ponyfill",
                "shim",
            ]),
            types_namespace: "@types/".to_string(),
            recent_window_days: 365,
            default_verdict: DefaultVerdict::AssumeCompatible,
        }
    }
}

/// Lowercased words of a free-text field
fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

fn mentions(tokens: &[String], mut candidates: impl Iterator<Item = String>) -> bool {
    candidates.any(|word| tokens.iter().any(|t| t.eq_ignore_ascii_case(&word)))
}

impl HeuristicPolicy {
    /// Classify a version that declares no peer requirement on the framework
    ///
    /// Signals are checked in order, first match wins: allow-list, ecosystem
    /// keywords (gated on recent publishing), utility keywords or the types
    /// namespace, then the default verdict.
    pub fn classify(
        &self,
        name: &str,
        manifest: &VersionManifest,
        metadata: &PackageMetadata,
        now: DateTime<Utc>,
    ) -> CompatibilityVerdict {
        if self.agnostic_packages.iter().any(|p| p == name) {
            return CompatibilityVerdict::compatible("known framework-agnostic package");
        }

        let keyword_words = || {
            manifest
                .keywords
                .iter()
                .flat_map(|k| words(k).collect::<Vec<_>>())
        };
        let description_words = manifest
            .description
            .as_deref()
            .into_iter()
            .flat_map(|d| words(d));

        if mentions(&self.ecosystem_tokens, keyword_words().chain(description_words)) {
            // A window reaching past the representable range has no cutoff
            let cutoff = TimeDelta::try_days(self.recent_window_days)
                .and_then(|window| now.checked_sub_signed(window))
                .unwrap_or(DateTime::<Utc>::MIN_UTC);
            return if metadata.has_release_since(cutoff) {
                CompatibilityVerdict::compatible("framework package with recent releases")
            } else {
                CompatibilityVerdict::incompatible("potentially outdated")
            };
        }

        if mentions(&self.utility_tokens, keyword_words()) {
            return CompatibilityVerdict::compatible("generic utility package");
        }

        if !self.types_namespace.is_empty() && name.starts_with(&self.types_namespace) {
            return CompatibilityVerdict::compatible("type definitions only");
        }

        match self.default_verdict {
            DefaultVerdict::AssumeCompatible => {
                CompatibilityVerdict::compatible("no peer requirement, assumed compatible")
            }
            DefaultVerdict::AssumeIncompatible => {
                CompatibilityVerdict::incompatible("no peer requirement, assumed incompatible")
            }
        }
    }
}
