//! Registry test utilities

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use module_versions::version::error::RegistryError;
use module_versions::version::registry::{PackageDetails, Registry};

/// Path of a fixture under `tests/fixtures`
pub fn fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(relative)
}

/// Mock registry for testing
#[derive(Default)]
pub struct MockRegistry {
    latest: HashMap<String, String>,
    details: HashMap<String, PackageDetails>,
    requested: Mutex<Vec<String>>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a package. `releases` pairs versions with RFC 3339 publish
    /// times; the last one is reported as latest.
    pub fn with_package(mut self, package: &str, releases: &[(&str, &str)]) -> Self {
        let mut details = PackageDetails::default();
        for (version, published) in releases {
            details.times.insert(
                version.to_string(),
                published
                    .parse::<DateTime<Utc>>()
                    .expect("fixture publish time must be RFC 3339"),
            );
        }

        if let Some((latest, _)) = releases.last() {
            self.latest.insert(package.to_string(), latest.to_string());
        }
        self.details.insert(package.to_string(), details);
        self
    }

    /// Packages whose latest version was requested, sorted
    pub fn requested(&self) -> Vec<String> {
        let mut requested = self.requested.lock().unwrap().clone();
        requested.sort();
        requested
    }
}

#[async_trait]
impl Registry for MockRegistry {
    async fn fetch_latest_version(&self, package_name: &str) -> Result<String, RegistryError> {
        self.requested
            .lock()
            .unwrap()
            .push(package_name.to_string());

        self.latest
            .get(package_name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(package_name.to_string()))
    }

    async fn fetch_package_details(
        &self,
        package_name: &str,
    ) -> Result<PackageDetails, RegistryError> {
        self.details
            .get(package_name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(package_name.to_string()))
    }
}

/// Registry with every module of the `versioned` fixture tree
pub fn versioned_fixture_registry() -> MockRegistry {
    MockRegistry::new()
        .with_package(
            "@elastic/elasticsearch",
            &[
                ("7.16.0", "2021-12-15T09:02:11.000Z"),
                ("8.13.1", "2024-04-09T14:40:07.000Z"),
            ],
        )
        .with_package(
            "@koa/router",
            &[
                ("8.0.0", "2019-06-17T16:06:26.000Z"),
                ("12.0.1", "2023-09-26T12:28:10.000Z"),
            ],
        )
        .with_package(
            "@langchain/core",
            &[
                ("0.1.17", "2024-01-25T01:20:54.000Z"),
                ("0.1.58", "2024-04-16T19:33:15.000Z"),
            ],
        )
        .with_package(
            "koa",
            &[
                ("2.0.0", "2017-02-25T19:10:03.000Z"),
                ("2.15.3", "2024-04-12T08:01:00.000Z"),
            ],
        )
        .with_package(
            "koa-route",
            &[
                ("3.0.0", "2016-03-17T01:07:39.000Z"),
                ("4.0.1", "2024-02-01T10:00:00.000Z"),
            ],
        )
        .with_package(
            "koa-router",
            &[
                ("7.1.0", "2016-12-13T21:34:45.000Z"),
                ("12.0.1", "2023-09-26T12:27:58.000Z"),
            ],
        )
        .with_package(
            "mongodb",
            &[
                ("2.1.0", "2015-12-22T15:39:34.000Z"),
                ("6.5.0", "2024-03-11T19:10:32.000Z"),
            ],
        )
        .with_package(
            "restify",
            &[
                ("5.0.0", "2017-06-27T18:55:26.000Z"),
                ("11.1.0", "2023-02-24T20:06:40.000Z"),
            ],
        )
}
