//! Exclusion rules applied before dependencies enter the work queue

use crate::domain::DependencyEntry;

/// Deny/allow rules for dependency names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionRules {
    /// Namespace prefixes to skip (e.g. `@angular/`)
    pub namespaces: Vec<String>,
    /// Exact names to skip
    pub exclude: Vec<String>,
    /// Exact names re-admitted even when a deny rule matches
    pub allow: Vec<String>,
}

impl ExclusionRules {
    /// Create empty rules (nothing excluded)
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules that skip the framework itself
    ///
    /// The framework package is excluded by name, and its scope (when it has
    /// one) by prefix: `@angular/core` excludes everything under `@angular/`.
    pub fn for_framework(framework_package: &str) -> Self {
        let mut rules = Self::new().with_exclude(vec![framework_package.to_string()]);
        if let Some((scope, _)) = framework_package.split_once('/') {
            if scope.starts_with('@') {
                rules.namespaces.push(format!("{}/", scope));
            }
        }
        rules
    }

    /// Add namespace prefixes to skip
    pub fn with_namespaces(mut self, namespaces: Vec<String>) -> Self {
        self.namespaces.extend(namespaces);
        self
    }

    /// Add exact names to skip
    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude.extend(exclude);
        self
    }

    /// Add names that override every deny rule
    pub fn with_allow(mut self, allow: Vec<String>) -> Self {
        self.allow.extend(allow);
        self
    }

    /// Check if a package should be processed
    pub fn should_process_package(&self, name: &str) -> bool {
        if self.allow.iter().any(|p| p == name) {
            return true;
        }
        if self.exclude.iter().any(|p| p == name) {
            return false;
        }
        !self.namespaces.iter().any(|ns| name.starts_with(ns.as_str()))
    }

    /// Keep only the entries that pass the rules
    pub fn apply(&self, entries: Vec<DependencyEntry>) -> Vec<DependencyEntry> {
        entries
            .into_iter()
            .filter(|e| self.should_process_package(&e.name))
            .collect()
    }
}
