//! Worker pool coordinating the compatibility check
//!
//! This module provides:
//! - A fixed pool of `min(jobs, N)` workers draining a shared FIFO queue
//! - The per-package pipeline: metadata → scan → classify → recommend
//! - Per-call registry deadlines
//! - Failure isolation: every entry yields exactly one record

use crate::aggregate::{ResultAggregator, LOST_NOTE};
use crate::classify::{Classifier, RegistryProbe};
use crate::config::EngineConfig;
use crate::domain::{DependencyEntry, Distance, Field, ResultRecord};
use crate::migration::MigrationLinks;
use crate::progress::{ProgressEvent, ProgressObserver};
use crate::recommend::{baseline, distance, recommend};
use crate::registry::{with_deadline, RegistryClient};
use crate::scan::Scanner;
use crate::version::{VersionHistory, VersionRecord};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Compatibility engine: owns the configuration and registry access
pub struct Engine {
    config: EngineConfig,
    registry: Arc<dyn RegistryClient>,
    classifier: Classifier,
    migration: MigrationLinks,
}

impl Engine {
    /// Create an engine for the given configuration and registry
    pub fn new(config: EngineConfig, registry: Arc<dyn RegistryClient>) -> Self {
        let classifier = Classifier::new(
            config.target_major,
            config.framework_package.clone(),
            config.include_prerelease,
            config.heuristics.clone(),
        );
        Self {
            config,
            registry,
            classifier,
            migration: MigrationLinks::default(),
        }
    }

    /// Use the given migration link table
    pub fn with_migration_links(mut self, migration: MigrationLinks) -> Self {
        self.migration = migration;
        self
    }

    /// Pin the clock used by heuristic recency checks
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.classifier = self.classifier.with_now(now);
        self
    }

    /// Check every entry and return one record per entry, sorted
    pub async fn run(
        self: &Arc<Self>,
        entries: Vec<DependencyEntry>,
        observer: Arc<dyn ProgressObserver>,
    ) -> Vec<ResultRecord> {
        let total = entries.len();
        let workers = self.config.jobs.max(1).min(total);

        info!(total, workers, target = self.config.target_major, "starting compatibility check");
        observer.on_event(&ProgressEvent::Started { total, workers });

        let queue = Arc::new(Mutex::new(entries.iter().cloned().collect::<VecDeque<_>>()));
        let aggregator = Arc::new(ResultAggregator::new());
        let finished = Arc::new(AtomicUsize::new(0));

        let mut pool = JoinSet::new();
        for worker in 0..workers {
            let engine = Arc::clone(self);
            let queue = Arc::clone(&queue);
            let aggregator = Arc::clone(&aggregator);
            let finished = Arc::clone(&finished);
            let observer = Arc::clone(&observer);

            pool.spawn(async move {
                loop {
                    let Some(entry) = queue.lock().await.pop_front() else {
                        break;
                    };

                    let record = engine.isolated_entry(worker, &entry, &observer).await;
                    aggregator.push(record).await;

                    let done = finished.fetch_add(1, Ordering::AcqRel) + 1;
                    observer.on_event(&ProgressEvent::Finished {
                        worker,
                        name: entry.name,
                        finished: done,
                        total,
                    });
                }
                debug!(worker, "queue drained, worker exiting");
            });
        }

        while let Some(joined) = pool.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "worker task aborted");
            }
        }

        observer.on_event(&ProgressEvent::Completed { total });
        aggregator.finish(&entries).await
    }

    /// Run one entry on its own task so a panic only costs that entry's record
    async fn isolated_entry(
        self: &Arc<Self>,
        worker: usize,
        entry: &DependencyEntry,
        observer: &Arc<dyn ProgressObserver>,
    ) -> ResultRecord {
        let engine = Arc::clone(self);
        let observer = Arc::clone(observer);
        let job = entry.clone();
        let handle = tokio::spawn(async move {
            engine.process_entry(worker, &job, observer.as_ref()).await
        });

        match handle.await {
            Ok(record) => record,
            Err(e) => {
                error!(package = %entry.name, error = %e, "package check aborted");
                ResultRecord::failed(entry, LOST_NOTE)
            }
        }
    }

    /// Run the full pipeline for one entry
    ///
    /// Never fails: registry errors become a record with sentinel fields.
    pub async fn process_entry(
        &self,
        worker: usize,
        entry: &DependencyEntry,
        observer: &dyn ProgressObserver,
    ) -> ResultRecord {
        let registry = self.registry.as_ref();
        let deadline = self.config.registry_timeout;
        let status = |status: String| observer.on_event(&ProgressEvent::Status { worker, status });

        status(format!("{}: fetching metadata", entry.name));
        let metadata = match with_deadline(
            deadline,
            &entry.name,
            registry.registry_name(),
            registry.package_metadata(&entry.name),
        )
        .await
        {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(package = %entry.name, error = %e, "registry lookup failed");
                return ResultRecord::failed(entry, format!("registry lookup failed: {}", e));
            }
        };

        let history = VersionHistory::from_versions(&metadata.versions, self.config.include_prerelease);
        let latest = metadata
            .latest_version
            .as_deref()
            .and_then(VersionRecord::parse)
            .or_else(|| history.newest().cloned());
        let current = entry.current_version();

        status(format!("{}: scanning {} versions", entry.name, history.len()));
        let probe = RegistryProbe::new(&entry.name, registry, &self.classifier, &metadata, deadline);
        let result = Scanner::new(self.config.scan_options())
            .scan(history.records(), current.as_ref(), &probe)
            .await;

        let recommendation = recommend(&result, current.as_ref(), latest.as_ref());
        let distance = distance(
            current.as_ref(),
            baseline(&result, latest.as_ref()).map(|r| &r.version),
        );

        let mut note = recommendation.note;
        if result.has_formal_peer_requirement && !result.is_contiguous() {
            warn!(package = %entry.name, "compatible versions are not contiguous");
            note.push_str("; compatible versions are not contiguous");
        }

        let (earliest_compatible, latest_compatible) = if result.has_formal_peer_requirement {
            (
                Field::or_not_applicable(result.earliest_compatible.as_ref().map(|r| r.raw.clone())),
                Field::or_not_applicable(result.latest_compatible.as_ref().map(|r| r.raw.clone())),
            )
        } else {
            (Field::NotApplicable, Field::NotApplicable)
        };

        info!(
            package = %entry.name,
            probed = result.probed_count(),
            formal = result.has_formal_peer_requirement,
            priority = %recommendation.priority,
            "package checked"
        );

        ResultRecord {
            name: entry.name.clone(),
            is_dev: entry.is_dev,
            current: Field::or_unknown(current.map(|v| v.to_string())),
            latest: Field::or_not_applicable(latest.map(|r| r.raw)),
            earliest_compatible,
            latest_compatible,
            peer_requirement: Field::or_not_applicable(result.declared_peer_range.clone()),
            distance: match distance {
                Distance::NoBaseline => Field::NotApplicable,
                other => Field::value(other.to_string()),
            },
            priority: recommendation.priority,
            target_version: Field::or_not_applicable(recommendation.target_version),
            note,
            migration_link: self.migration.link(&entry.name, Some(&metadata)),
        }
    }
}
