use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// =============================================================================
// Pipeline constants
// =============================================================================

/// Default base URL for the npm registry
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// User agent sent with every registry request
pub const DEFAULT_USER_AGENT: &str = "module-versions";

/// File name of a versioned test descriptor
pub const DESCRIPTOR_FILE_NAME: &str = "package.json";

/// Number of walk results buffered before the walker waits for the consumer
pub const WALK_CHANNEL_CAPACITY: usize = 32;

/// Range substituted for the `latest` keyword. The range grammar has no
/// open-ended "any future version" form, so an upper bound that no real
/// release reaches stands in for it.
pub const LATEST_RANGE: &str = "<=999.999.999";

/// Version reported for a range without a lower boundary
pub const UNBOUNDED_MIN_VERSION: &str = "0.0.0";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Report configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportConfig {
    pub registry: RegistryConfig,
    /// Versioned test trees to walk
    pub test_dirs: Vec<PathBuf>,
}

/// Registry-related configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistryConfig {
    pub base_url: String,
    pub user_agent: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REGISTRY_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ReportConfig {
    /// Loads the configuration from a JSON file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies command line overrides on top of the loaded values
    pub fn with_overrides(mut self, registry_url: Option<String>, test_dirs: Vec<PathBuf>) -> Self {
        if let Some(url) = registry_url {
            self.registry.base_url = url;
        }
        if !test_dirs.is_empty() {
            self.test_dirs = test_dirs;
        }
        self
    }
}
