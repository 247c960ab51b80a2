//! Release data for one resolved target

use chrono::NaiveDate;
use serde::Serialize;

use crate::version::error::RegistryError;
use crate::version::registry::Registry;
use crate::version::resolver::ResolvedTarget;

/// A resolved target enriched with registry metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseData {
    pub name: String,
    pub min_supported_version: String,
    /// Publish date of `min_supported_version`, if the registry knows it
    pub min_supported_version_release: Option<NaiveDate>,
    pub latest_version: String,
    pub latest_version_release: Option<NaiveDate>,
    pub min_agent_version: String,
}

/// Look up the latest version and publish dates of a resolved target.
///
/// Both registry requests run concurrently; either failing fails the target.
pub async fn build_release_data(
    registry: &dyn Registry,
    target: ResolvedTarget,
) -> Result<ReleaseData, RegistryError> {
    let (latest_version, details) = futures::try_join!(
        registry.fetch_latest_version(&target.name),
        registry.fetch_package_details(&target.name),
    )?;

    let release_date =
        |version: &str| details.published_at(version).map(|time| time.date_naive());

    Ok(ReleaseData {
        min_supported_version_release: release_date(&target.min_version),
        latest_version_release: release_date(&latest_version),
        name: target.name,
        min_supported_version: target.min_version,
        latest_version,
        min_agent_version: target.min_agent_version,
    })
}
