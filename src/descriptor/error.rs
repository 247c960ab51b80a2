use std::path::PathBuf;

use thiserror::Error;

/// Failure to decode a single dependency entry of a test case
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DependencyError {
    #[error("dependency block is missing `versions`")]
    MissingVersions,

    #[error("dependency `versions` must be a string, found {0}")]
    InvalidVersions(String),

    #[error("dependency `samples` must be a non-negative integer, found {0}")]
    InvalidSamples(String),

    #[error("expected a version string or a dependency block, found {0}")]
    UnexpectedShape(String),
}

/// Failure scoped to one descriptor entry of a walk
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("could not find {file} in `{dir}`", file = crate::config::DESCRIPTOR_FILE_NAME)]
    Missing { dir: PathBuf },

    #[error("failed to read `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode `{path}`: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure that ends the walk of a whole test tree
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("failed to read directory `{path}`: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
