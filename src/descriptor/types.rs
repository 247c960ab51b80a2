//! Versioned test descriptor types
//!
//! A descriptor is the `package.json` of one versioned test directory. Besides
//! the usual package fields it lists the modules under test (`targets`) and
//! the test cases with the dependency ranges each case installs.

use indexmap::IndexMap;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::descriptor::error::DependencyError;

/// Decoded test descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawTestDescriptor")]
pub struct TestDescriptor {
    pub name: String,
    pub targets: Vec<Target>,
    pub version: String,
    pub private: bool,
    pub tests: Vec<TestCase>,
}

/// A module exercised by a descriptor's test cases
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub name: String,
    /// First agent release that instruments this module
    #[serde(default, deserialize_with = "nullable")]
    pub min_agent_version: String,
}

/// One test case of a descriptor
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawTestCase")]
pub struct TestCase {
    /// Only an explicit `false` marks a case as unsupported
    pub supported: bool,
    pub comment: String,
    pub engines: Engines,
    /// Dependencies in declaration order
    pub dependencies: IndexMap<String, DependencySpec>,
    pub files: Vec<String>,
}

impl Default for TestCase {
    fn default() -> Self {
        Self {
            supported: true,
            comment: String::new(),
            engines: Engines::default(),
            dependencies: IndexMap::new(),
            files: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Engines {
    pub node: Option<String>,
}

/// Version range and sample count for one dependency of a test case
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySpec {
    pub versions: String,
    pub samples: u32,
}

impl DependencySpec {
    /// Decodes either the `"^1.0.0"` shorthand or a full
    /// `{"versions": "^1.0.0", "samples": 2}` block.
    pub fn from_value(value: Value) -> Result<Self, DependencyError> {
        match value {
            Value::Object(block) => Self::from_block(block),
            Value::String(versions) => Ok(Self {
                versions,
                samples: 0,
            }),
            other => Err(DependencyError::UnexpectedShape(other.to_string())),
        }
    }

    fn from_block(mut block: Map<String, Value>) -> Result<Self, DependencyError> {
        let versions = match block.remove("versions") {
            Some(Value::String(versions)) => versions,
            Some(other) => return Err(DependencyError::InvalidVersions(other.to_string())),
            None => return Err(DependencyError::MissingVersions),
        };

        let samples = match block.remove("samples") {
            None | Some(Value::Null) => 0,
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| DependencyError::InvalidSamples(n.to_string()))?,
            Some(Value::String(s)) => s
                .trim()
                .parse::<u32>()
                .map_err(|_| DependencyError::InvalidSamples(format!("\"{}\"", s)))?,
            Some(other) => return Err(DependencyError::InvalidSamples(other.to_string())),
        };

        Ok(Self { versions, samples })
    }
}

impl<'de> Deserialize<'de> for DependencySpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(de::Error::custom)
    }
}

/// Parse descriptor JSON text
pub fn parse_descriptor(content: &str) -> Result<TestDescriptor, serde_json::Error> {
    serde_json::from_str(content)
}

/// Treats an explicit `null` like a missing key
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawTestDescriptor {
    #[serde(deserialize_with = "nullable")]
    name: String,
    #[serde(deserialize_with = "nullable")]
    targets: Vec<Target>,
    /// Older descriptors name a single module instead of listing targets
    target: Option<String>,
    #[serde(deserialize_with = "nullable")]
    version: String,
    #[serde(deserialize_with = "nullable")]
    private: bool,
    #[serde(deserialize_with = "nullable")]
    tests: Vec<Option<TestCase>>,
}

impl From<RawTestDescriptor> for TestDescriptor {
    fn from(raw: RawTestDescriptor) -> Self {
        let mut targets = raw.targets;
        if targets.is_empty()
            && let Some(name) = raw.target.filter(|name| !name.is_empty())
        {
            targets.push(Target {
                name,
                min_agent_version: String::new(),
            });
        }

        Self {
            name: raw.name,
            targets,
            version: raw.version,
            private: raw.private,
            tests: raw.tests.into_iter().flatten().collect(),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawTestCase {
    /// Values other than a boolean are ignored
    supported: Value,
    #[serde(deserialize_with = "nullable")]
    comment: String,
    #[serde(deserialize_with = "nullable")]
    engines: Engines,
    #[serde(deserialize_with = "nullable")]
    dependencies: IndexMap<String, DependencySpec>,
    #[serde(deserialize_with = "nullable")]
    files: Vec<String>,
}

impl From<RawTestCase> for TestCase {
    fn from(raw: RawTestCase) -> Self {
        Self {
            supported: raw.supported != Value::Bool(false),
            comment: raw.comment,
            engines: raw.engines,
            dependencies: raw.dependencies,
            files: raw.files,
        }
    }
}
