//! Registry trait for fetching release metadata from a package registry

use std::collections::HashMap;

use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;

use crate::version::error::RegistryError;

/// Publication metadata of a package, keyed by version
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageDetails {
    /// Publish time per version
    pub times: HashMap<String, DateTime<Utc>>,
}

impl PackageDetails {
    /// Publish time of a version, if the registry reported one
    pub fn published_at(&self, version: &str) -> Option<DateTime<Utc>> {
        self.times.get(version).copied()
    }
}

/// Trait for fetching release metadata from a registry
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Fetches the version currently tagged as latest
    async fn fetch_latest_version(&self, package_name: &str) -> Result<String, RegistryError>;

    /// Fetches every published version with its publish time
    async fn fetch_package_details(
        &self,
        package_name: &str,
    ) -> Result<PackageDetails, RegistryError>;
}
