//! Integration tests for peercheck
//!
//! These tests verify:
//! - The engine returns one sorted record per input entry
//! - Registry failures and deadlines become failure rows
//! - Early exit and extension control how many versions are probed
//! - Manifest reading and exclusion rules work together

use async_trait::async_trait;
use peercheck::config::EngineConfig;
use peercheck::domain::{DependencyEntry, Field, Priority, ResultRecord};
use peercheck::error::RegistryError;
use peercheck::orchestrator::Engine;
use peercheck::progress::{NoopObserver, ProgressTracker};
use peercheck::registry::{PackageMetadata, RegistryClient, VersionManifest};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// In-memory registry with call counting and an optional metadata delay
#[derive(Default)]
struct MemoryRegistry {
    packages: HashMap<String, PackageMetadata>,
    manifests: HashMap<(String, String), VersionManifest>,
    metadata_delay: Option<Duration>,
    manifest_calls: AtomicUsize,
}

impl MemoryRegistry {
    /// Add a package; versions are listed newest first and the first is `latest`
    fn package(mut self, name: &str, versions: &[&str]) -> Self {
        self.packages.insert(
            name.to_string(),
            PackageMetadata {
                name: name.to_string(),
                latest_version: versions.first().map(|v| v.to_string()),
                versions: versions.iter().map(|v| v.to_string()).collect(),
                ..Default::default()
            },
        );
        self
    }

    /// Declare a peer range on the framework for one version
    fn peer(mut self, name: &str, version: &str, range: &str) -> Self {
        let mut peer_dependencies = BTreeMap::new();
        peer_dependencies.insert("@angular/core".to_string(), range.to_string());
        self.manifests.insert(
            (name.to_string(), version.to_string()),
            VersionManifest {
                version: version.to_string(),
                peer_dependencies,
                ..Default::default()
            },
        );
        self
    }

    fn delay_metadata(mut self, delay: Duration) -> Self {
        self.metadata_delay = Some(delay);
        self
    }

    fn manifest_calls(&self) -> usize {
        self.manifest_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RegistryClient for MemoryRegistry {
    fn registry_name(&self) -> &'static str {
        "memory"
    }

    async fn package_metadata(&self, package: &str) -> Result<PackageMetadata, RegistryError> {
        if let Some(delay) = self.metadata_delay {
            tokio::time::sleep(delay).await;
        }
        self.packages
            .get(package)
            .cloned()
            .ok_or_else(|| RegistryError::not_found(package, "memory"))
    }

    async fn version_manifest(
        &self,
        package: &str,
        version: &str,
    ) -> Result<VersionManifest, RegistryError> {
        self.manifest_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .manifests
            .get(&(package.to_string(), version.to_string()))
            .cloned()
            .unwrap_or_else(|| VersionManifest {
                version: version.to_string(),
                ..Default::default()
            }))
    }
}

fn config(target_major: u64) -> EngineConfig {
    EngineConfig {
        target_major,
        jobs: 3,
        registry_timeout: Duration::from_secs(5),
        ..Default::default()
    }
}

async fn run(
    registry: Arc<MemoryRegistry>,
    config: EngineConfig,
    entries: Vec<DependencyEntry>,
) -> Vec<ResultRecord> {
    let engine = Arc::new(Engine::new(config, registry));
    engine.run(entries, Arc::new(NoopObserver)).await
}

mod engine {
    use super::*;

    #[tokio::test]
    async fn test_one_record_per_entry_in_order() {
        let registry = Arc::new(
            MemoryRegistry::default()
                .package("rxjs", &["7.8.1", "7.8.0"])
                .package("typescript", &["5.4.5"])
                .package("tslib", &["2.6.2"]),
        );
        let entries = vec![
            DependencyEntry::development("typescript", "~5.4.0"),
            DependencyEntry::production("tslib", "^2.6.0"),
            DependencyEntry::production("typescript", "~5.4.0"),
            DependencyEntry::development("jest", "^29.0.0"),
            DependencyEntry::production("rxjs", "~7.8.0"),
        ];

        let records = run(registry, config(17), entries.clone()).await;

        assert_eq!(records.len(), entries.len());
        let order: Vec<(&str, bool)> = records
            .iter()
            .map(|r| (r.name.as_str(), r.is_dev))
            .collect();
        assert_eq!(
            order,
            vec![
                ("rxjs", false),
                ("tslib", false),
                ("typescript", false),
                ("jest", true),
                ("typescript", true),
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_rows_keep_the_batch_going() {
        let registry = Arc::new(MemoryRegistry::default().package("rxjs", &["7.8.1"]));
        let entries = vec![
            DependencyEntry::production("does-not-exist", "^1.2.0"),
            DependencyEntry::production("rxjs", "7.8.1"),
        ];

        let records = run(registry, config(17), entries).await;

        let failed = &records[0];
        assert_eq!(failed.name, "does-not-exist");
        assert_eq!(failed.priority, Priority::Unknown);
        assert_eq!(failed.current, Field::value("1.2.0"));
        assert_eq!(failed.latest, Field::Unknown);
        assert_eq!(failed.peer_requirement, Field::Unknown);
        assert!(failed.note.starts_with("registry lookup failed"));

        assert_eq!(records[1].priority, Priority::Keep);
        assert_eq!(records[1].note, "up to date");
    }

    #[tokio::test]
    async fn test_overflowing_peer_range_only_affects_its_package() {
        let huge = "^18446744073709551615.0.0";
        let registry = Arc::new(
            MemoryRegistry::default()
                .package("evil", &["2.0.0"])
                .peer("evil", "2.0.0", huge)
                .package("good-a", &["1.0.0"])
                .package("good-b", &["1.0.0"]),
        );
        let config = EngineConfig {
            jobs: 1,
            ..config(17)
        };
        let entries = vec![
            DependencyEntry::production("evil", "2.0.0"),
            DependencyEntry::production("good-a", "1.0.0"),
            DependencyEntry::production("good-b", "1.0.0"),
        ];

        let records = run(registry, config, entries).await;

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name, "evil");
        assert_eq!(records[0].peer_requirement, Field::value(huge));
        assert_ne!(records[0].note, "processing aborted");
        assert_eq!(records[1].priority, Priority::Keep);
        assert_eq!(records[2].priority, Priority::Keep);
    }

    #[tokio::test]
    async fn test_progress_reaches_total() {
        let registry = Arc::new(
            MemoryRegistry::default()
                .package("a", &["1.0.0"])
                .package("b", &["1.0.0"]),
        );
        let engine = Arc::new(Engine::new(config(17), registry));
        let tracker = Arc::new(ProgressTracker::new());
        let entries = vec![
            DependencyEntry::production("a", "1.0.0"),
            DependencyEntry::production("b", "1.0.0"),
            DependencyEntry::production("c", "1.0.0"),
        ];

        let records = engine.run(entries, tracker.clone()).await;

        assert_eq!(records.len(), 3);
        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.finished, 3);
        assert_eq!(snapshot.total, 3);
        assert_eq!(snapshot.percent(), 100.0);
    }

    #[tokio::test]
    async fn test_unconstrained_package_exits_early() {
        let registry = Arc::new(MemoryRegistry::default().package(
            "lodash",
            &["4.17.21", "4.17.20", "4.17.19", "4.17.18", "4.17.17"],
        ));

        let records = run(
            registry.clone(),
            config(17),
            vec![DependencyEntry::production("lodash", "^4.17.17")],
        )
        .await;

        assert_eq!(registry.manifest_calls(), 1);
        assert_eq!(records[0].priority, Priority::OptionalUpgrade);
        assert_eq!(records[0].target_version, Field::value("4.17.21"));
        assert_eq!(records[0].earliest_compatible, Field::NotApplicable);
    }

    #[tokio::test]
    async fn test_exhaustive_probes_everything() {
        let registry = Arc::new(MemoryRegistry::default().package(
            "lodash",
            &["4.17.21", "4.17.20", "4.17.19", "4.17.18", "4.17.17"],
        ));
        let config = EngineConfig {
            exhaustive: true,
            ..config(17)
        };

        run(
            registry.clone(),
            config,
            vec![DependencyEntry::production("lodash", "^4.17.17")],
        )
        .await;

        assert_eq!(registry.manifest_calls(), 5);
    }

    #[tokio::test]
    async fn test_fast_scan_extends_to_current_version() {
        let registry = Arc::new(
            MemoryRegistry::default()
                .package("@ngrx/store", &["18.0.0", "17.0.0", "16.0.0", "15.0.0"])
                .peer("@ngrx/store", "18.0.0", "^18.0.0")
                .peer("@ngrx/store", "17.0.0", "^17.0.0")
                .peer("@ngrx/store", "16.0.0", "^16.0.0")
                .peer("@ngrx/store", "15.0.0", "^15.0.0"),
        );
        let config = EngineConfig {
            fast_limit: Some(2),
            ..config(18)
        };

        let records = run(
            registry.clone(),
            config,
            vec![DependencyEntry::production("@ngrx/store", "^16.0.0")],
        )
        .await;

        assert_eq!(registry.manifest_calls(), 3);
        let record = &records[0];
        assert_eq!(record.priority, Priority::MustUpgrade);
        assert_eq!(record.target_version, Field::value("18.0.0"));
        assert_eq!(record.earliest_compatible, Field::value("18.0.0"));
        assert_eq!(record.latest_compatible, Field::value("18.0.0"));
        assert_eq!(record.distance, Field::value("2 majors behind"));
        assert_eq!(record.migration_link, Field::value("https://ngrx.io/guide/migration"));
    }

    #[tokio::test]
    async fn test_fast_scan_without_current_stays_within_limit() {
        let registry = Arc::new(
            MemoryRegistry::default()
                .package("@ngrx/store", &["18.0.0", "17.0.0", "16.0.0"])
                .peer("@ngrx/store", "18.0.0", "^18.0.0")
                .peer("@ngrx/store", "17.0.0", "^17.0.0")
                .peer("@ngrx/store", "16.0.0", "^16.0.0"),
        );
        let config = EngineConfig {
            fast_limit: Some(1),
            ..config(18)
        };

        let records = run(
            registry.clone(),
            config,
            vec![DependencyEntry::production("@ngrx/store", "latest")],
        )
        .await;

        assert_eq!(registry.manifest_calls(), 1);
        assert_eq!(records[0].current, Field::Unknown);
        assert_eq!(records[0].priority, Priority::Unknown);
        assert_eq!(records[0].target_version, Field::value("18.0.0"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_registry_call_times_out() {
        let registry = Arc::new(
            MemoryRegistry::default()
                .package("rxjs", &["7.8.1"])
                .delay_metadata(Duration::from_secs(120)),
        );
        let config = EngineConfig {
            registry_timeout: Duration::from_secs(1),
            ..config(17)
        };

        let records = run(
            registry,
            config,
            vec![DependencyEntry::production("rxjs", "^7.8.0")],
        )
        .await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].priority, Priority::Unknown);
        assert!(records[0].note.contains("timeout"));
    }
}

mod manifest_filtering {
    use peercheck::manifest::{read_manifest, ExclusionRules};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_framework_packages_are_excluded() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{
                "dependencies": {
                    "@angular/core": "^17.0.0",
                    "@angular/router": "^17.0.0",
                    "@angular/cdk": "^17.0.0",
                    "@ngrx/store": "^17.0.0"
                },
                "devDependencies": {
                    "jest": "^29.0.0",
                    "internal-tool": "1.0.0"
                }
            }"#,
        )
        .unwrap();

        let entries = read_manifest(dir.path()).unwrap();
        assert_eq!(entries.len(), 6);

        let rules = ExclusionRules::for_framework("@angular/core")
            .with_exclude(vec!["internal-tool".to_string()])
            .with_allow(vec!["@angular/cdk".to_string()]);
        let kept = rules.apply(entries);

        let mut names: Vec<&str> = kept.iter().map(|e| e.name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["@angular/cdk", "@ngrx/store", "jest"]);
    }
}
