//! Report aggregation
//!
//! Walks every test tree into one shared channel, resolves descriptors as
//! they arrive and enriches each resolved target on its own task. Once the
//! walks have finished and every enrichment task has been joined, the
//! collected release data is sorted by name and pruned to one entry per
//! module.
//!
//! - release.rs: Release data and registry enrichment
//! - prune.rs: Sorting and deduplication

pub mod prune;
pub mod release;

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::config::WALK_CHANNEL_CAPACITY;
use crate::descriptor::error::{DescriptorError, WalkError};
use crate::descriptor::walker::{WalkEntry, spawn_walk};
use crate::version::error::{RegistryError, ResolveError};
use crate::version::registry::Registry;
use crate::version::resolver::TargetResolver;

pub use prune::{prune_release_data, sort_release_data};
pub use release::{ReleaseData, build_release_data};

/// Something that kept part of the input out of the report
#[derive(Debug, Error)]
pub enum ReportProblem {
    #[error(transparent)]
    Walk(#[from] WalkError),

    #[error("skipping {name}: {source}")]
    Descriptor {
        name: String,
        #[source]
        source: DescriptorError,
    },

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("failed to fetch release data for {name}: {source}")]
    Enrich {
        name: String,
        #[source]
        source: RegistryError,
    },

    #[error("release data task failed: {0}")]
    Task(String),
}

#[derive(Debug, Default)]
pub struct Report {
    /// One entry per module, sorted by name
    pub releases: Vec<ReleaseData>,
    pub problems: Vec<ReportProblem>,
}

impl Report {
    /// Whether a whole test tree could not be read
    pub fn has_walk_failures(&self) -> bool {
        self.problems
            .iter()
            .any(|problem| matches!(problem, ReportProblem::Walk(_)))
    }
}

/// Build the report for every test tree in `test_dirs`.
///
/// Failures are scoped: a bad descriptor skips its directory, a bad range
/// skips its target and a registry failure drops its module. Each is logged
/// and recorded in [`Report::problems`].
pub async fn build_report(test_dirs: &[PathBuf], registry: Arc<dyn Registry>) -> Report {
    let (sender, mut receiver) = mpsc::channel(WALK_CHANNEL_CAPACITY);
    for dir in test_dirs {
        spawn_walk(dir.clone(), sender.clone());
    }
    // The channel closes once the last walk drops its sender
    drop(sender);

    let resolver = TargetResolver::new();
    let mut tasks = JoinSet::new();
    let mut problems = Vec::new();

    while let Some(result) = receiver.recv().await {
        let WalkEntry {
            name, descriptor, ..
        } = match result {
            Ok(entry) => entry,
            Err(e) => {
                error!("{}", e);
                problems.push(ReportProblem::Walk(e));
                continue;
            }
        };

        let descriptor = match descriptor {
            Ok(descriptor) => descriptor,
            Err(source) => {
                error!("Skipping {}: {}", name, source);
                problems.push(ReportProblem::Descriptor { name, source });
                continue;
            }
        };

        let resolution = resolver.resolve(&descriptor);
        for failure in resolution.failures {
            if failure.is_target_missing() {
                debug!("{}", failure);
            } else {
                warn!("{}", failure);
            }
            problems.push(ReportProblem::Resolve(failure));
        }

        for target in resolution.resolved {
            let registry = Arc::clone(&registry);
            tasks.spawn(async move {
                let name = target.name.clone();
                debug!("Fetching release data for {}", name);
                (name, build_release_data(registry.as_ref(), target).await)
            });
        }
    }

    let mut releases = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(release))) => releases.push(release),
            Ok((name, Err(source))) => {
                warn!("Failed to fetch release data for {}: {}", name, source);
                problems.push(ReportProblem::Enrich { name, source });
            }
            Err(e) => {
                error!("Release data task failed: {}", e);
                problems.push(ReportProblem::Task(e.to_string()));
            }
        }
    }

    info!(
        "Collected release data for {} targets, {} problems",
        releases.len(),
        problems.len()
    );

    sort_release_data(&mut releases);
    Report {
        releases: prune_release_data(releases),
        problems,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DESCRIPTOR_FILE_NAME;
    use crate::version::registry::{MockRegistry, PackageDetails};
    use std::path::Path;
    use tempfile::TempDir;

    fn write_descriptor(dir: &Path, content: &str) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(dir.join(DESCRIPTOR_FILE_NAME), content).unwrap();
    }

    fn registry_with_latest(latest: &'static str) -> MockRegistry {
        let mut registry = MockRegistry::new();
        registry
            .expect_fetch_latest_version()
            .returning(move |name| match name {
                "broken" => Err(RegistryError::NotFound(name.to_string())),
                _ => Ok(latest.to_string()),
            });
        registry
            .expect_fetch_package_details()
            .returning(|_| Ok(PackageDetails::default()));
        registry
    }

    fn summary(report: &Report) -> Vec<(&str, &str)> {
        report
            .releases
            .iter()
            .map(|r| (r.name.as_str(), r.min_supported_version.as_str()))
            .collect()
    }

    #[tokio::test]
    async fn build_report_merges_duplicate_modules_across_trees() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        write_descriptor(
            &first.path().join("koa"),
            r#"{"name": "koa-tests", "targets": [{"name": "koa", "minAgentVersion": "3.2.0"}],
                "tests": [{"dependencies": {"koa": ">=2.0.0"}}]}"#,
        );
        write_descriptor(
            &second.path().join("koa-router"),
            r#"{"name": "koa-router-tests", "targets": [{"name": "koa"}, {"name": "koa-router"}],
                "tests": [{"dependencies": {"koa": ">=1.5.0", "koa-router": ">=7.1.0"}}]}"#,
        );

        let registry: Arc<dyn Registry> = Arc::new(registry_with_latest("9.9.9"));
        let report = build_report(
            &[first.path().to_path_buf(), second.path().to_path_buf()],
            registry,
        )
        .await;

        assert_eq!(
            summary(&report),
            vec![("koa", "1.5.0"), ("koa-router", "7.1.0")]
        );
        assert!(report.problems.is_empty());
        assert_eq!(report.releases[1].latest_version, "9.9.9");
    }

    #[tokio::test]
    async fn build_report_drops_targets_that_fail_enrichment() {
        let root = TempDir::new().unwrap();
        write_descriptor(
            &root.path().join("mixed"),
            r#"{"name": "mixed", "targets": [{"name": "broken"}, {"name": "fine"}],
                "tests": [{"dependencies": {"broken": "1.0.0", "fine": "^2.0.0"}}]}"#,
        );

        let registry: Arc<dyn Registry> = Arc::new(registry_with_latest("2.3.0"));
        let report = build_report(&[root.path().to_path_buf()], registry).await;

        assert_eq!(summary(&report), vec![("fine", "2.0.0")]);
        assert!(matches!(
            report.problems.as_slice(),
            [ReportProblem::Enrich { name, source: RegistryError::NotFound(_) }] if name == "broken"
        ));
    }

    #[tokio::test]
    async fn build_report_records_scoped_problems() {
        let root = TempDir::new().unwrap();
        write_descriptor(&root.path().join("bad-json"), "{ not json");
        write_descriptor(
            &root.path().join("bad-range"),
            r#"{"name": "bad-range", "targets": [{"name": "x"}],
                "tests": [{"dependencies": {"x": "> 1.0.0 || >=2.0.0 <"}}]}"#,
        );
        write_descriptor(
            &root.path().join("untested"),
            r#"{"name": "untested", "targets": [{"name": "y"}],
                "tests": [{"supported": false, "dependencies": {"y": ">=1.0.0"}}]}"#,
        );
        write_descriptor(
            &root.path().join("zlib"),
            r#"{"name": "zlib", "targets": [{"name": "zlib"}],
                "tests": [{"dependencies": {"zlib": ">=1.0.0"}}]}"#,
        );

        let registry: Arc<dyn Registry> = Arc::new(registry_with_latest("1.0.0"));
        let report = build_report(&[root.path().to_path_buf()], registry).await;

        assert_eq!(summary(&report), vec![("zlib", "1.0.0")]);
        assert_eq!(report.problems.len(), 3);
        assert!(matches!(
            &report.problems[0],
            ReportProblem::Descriptor { name, source: DescriptorError::Decode { .. } } if name == "bad-json"
        ));
        assert!(matches!(
            &report.problems[1],
            ReportProblem::Resolve(ResolveError::InvalidRange { .. })
        ));
        assert!(matches!(
            &report.problems[2],
            ReportProblem::Resolve(e) if e.is_target_missing()
        ));
        assert!(!report.has_walk_failures());
    }

    #[tokio::test]
    async fn build_report_continues_past_unreadable_tree() {
        let root = TempDir::new().unwrap();
        write_descriptor(
            &root.path().join("zlib"),
            r#"{"name": "zlib", "targets": [{"name": "zlib"}],
                "tests": [{"dependencies": {"zlib": ">=1.0.0"}}]}"#,
        );

        let registry: Arc<dyn Registry> = Arc::new(registry_with_latest("1.0.0"));
        let report = build_report(
            &[
                root.path().join("does-not-exist"),
                root.path().to_path_buf(),
            ],
            registry,
        )
        .await;

        assert_eq!(summary(&report), vec![("zlib", "1.0.0")]);
        assert!(report.has_walk_failures());
    }

    #[tokio::test]
    async fn build_report_with_no_trees_is_empty() {
        let registry: Arc<dyn Registry> = Arc::new(MockRegistry::new());

        let report = build_report(&[], registry).await;

        assert!(report.releases.is_empty());
        assert!(report.problems.is_empty());
    }
}
