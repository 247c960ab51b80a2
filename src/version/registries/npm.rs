//! npm registry API implementation

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use reqwest::header::RETRY_AFTER;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::{DEFAULT_REGISTRY_URL, DEFAULT_USER_AGENT};
use crate::version::error::RegistryError;
use crate::version::registry::{PackageDetails, Registry};

/// Response from the `/{package}/latest` endpoint
#[derive(Debug, Deserialize)]
struct NpmLatestResponse {
    version: String,
}

/// Response from the `/{package}` endpoint
#[derive(Debug, Deserialize)]
struct NpmPackageResponse {
    #[serde(default)]
    time: HashMap<String, String>,
}

/// Registry implementation for npm registry API
pub struct NpmRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl NpmRegistry {
    /// Creates a new NpmRegistry with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self::with_user_agent(base_url, DEFAULT_USER_AGENT)
    }

    /// Creates a new NpmRegistry with a custom base URL and user agent
    pub fn with_user_agent(base_url: &str, user_agent: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Encode package name for URL (handles scoped packages)
    fn encode_package_name(package_name: &str) -> String {
        if package_name.starts_with('@') {
            // Scoped package: @scope/name -> @scope%2Fname
            package_name.replace('/', "%2F")
        } else {
            package_name.to_string()
        }
    }

    /// GET a registry document and decode it, mapping status codes to errors
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        package_name: &str,
    ) -> Result<T, RegistryError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(package_name.to_string()));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok());
            warn!("npm registry rate limited request: {}", url);
            return Err(RegistryError::RateLimited { retry_after_secs });
        }

        if !status.is_success() {
            warn!("npm registry returned status {}: {}", status, url);
            return Err(RegistryError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        response.json().await.map_err(|e| {
            warn!("Failed to parse npm registry response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })
    }
}

impl Default for NpmRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_REGISTRY_URL)
    }
}

#[async_trait::async_trait]
impl Registry for NpmRegistry {
    async fn fetch_latest_version(&self, package_name: &str) -> Result<String, RegistryError> {
        let encoded_name = Self::encode_package_name(package_name);
        let url = format!("{}/{}/latest", self.base_url, encoded_name);

        let latest: NpmLatestResponse = self.get_json(&url, package_name).await?;
        Ok(latest.version)
    }

    async fn fetch_package_details(
        &self,
        package_name: &str,
    ) -> Result<PackageDetails, RegistryError> {
        let encoded_name = Self::encode_package_name(package_name);
        let url = format!("{}/{}", self.base_url, encoded_name);

        let package_info: NpmPackageResponse = self.get_json(&url, package_name).await?;

        let times = package_info
            .time
            .into_iter()
            .map(|(version, time)| {
                DateTime::parse_from_rfc3339(&time)
                    .map(|parsed| (version, parsed.with_timezone(&Utc)))
                    .map_err(|e| {
                        RegistryError::InvalidResponse(format!(
                            "invalid publish time `{}` for {}: {}",
                            time, package_name, e
                        ))
                    })
            })
            .collect::<Result<HashMap<_, _>, _>>()?;

        Ok(PackageDetails { times })
    }
}
