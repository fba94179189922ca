//! Migration guide links
//!
//! Lookup order: configured overrides, the built-in table, the package
//! homepage, its repository URL.

use crate::domain::Field;
use crate::registry::PackageMetadata;
use std::collections::BTreeMap;

/// Well-known migration guides
const KNOWN_GUIDES: &[(&str, &str)] = &[
    ("@angular/cdk", "https://angular.dev/update-guide"),
    ("@angular/material", "https://material.angular.io/guide/getting-started"),
    ("@ngrx/store", "https://ngrx.io/guide/migration"),
    ("@ngrx/effects", "https://ngrx.io/guide/migration"),
    ("@ngrx/entity", "https://ngrx.io/guide/migration"),
    ("@ngrx/router-store", "https://ngrx.io/guide/migration"),
    ("@ngrx/store-devtools", "https://ngrx.io/guide/migration"),
    ("@ngrx/component-store", "https://ngrx.io/guide/migration"),
    ("@ngx-translate/core", "https://github.com/ngx-translate/core/releases"),
    ("@ng-bootstrap/ng-bootstrap", "https://ng-bootstrap.github.io/#/getting-started"),
    ("ngx-bootstrap", "https://github.com/valor-software/ngx-bootstrap/releases"),
    ("primeng", "https://primeng.org/migration"),
    ("rxjs", "https://rxjs.dev/deprecations/breaking-changes"),
    ("zone.js", "https://github.com/angular/angular/blob/main/packages/zone.js/CHANGELOG.md"),
    ("typescript", "https://www.typescriptlang.org/docs/handbook/release-notes/overview.html"),
];

/// Resolves a migration link per package
#[derive(Debug, Clone, Default)]
pub struct MigrationLinks {
    overrides: BTreeMap<String, String>,
}

impl MigrationLinks {
    pub fn new(overrides: BTreeMap<String, String>) -> Self {
        Self { overrides }
    }

    /// Link for a package, falling back to its registry metadata
    pub fn link(&self, name: &str, metadata: Option<&PackageMetadata>) -> Field {
        if let Some(url) = self.overrides.get(name) {
            return Field::value(url.clone());
        }
        if let Some((_, url)) = KNOWN_GUIDES.iter().find(|(pkg, _)| *pkg == name) {
            return Field::value(*url);
        }

        let fallback = metadata.and_then(|m| {
            m.homepage
                .as_deref()
                .or(m.repository_url.as_deref())
                .filter(|url| !url.is_empty())
        });
        Field::or_not_applicable(fallback)
    }
}
