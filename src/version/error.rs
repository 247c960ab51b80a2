use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("failed to parse version string `{range}` (from `{source_expr}`): {reason}")]
    Parse {
        /// The normalized range that failed to parse
        range: String,
        /// The expression as written in the descriptor
        source_expr: String,
        reason: String,
    },
}

impl RangeError {
    /// The range that failed to parse
    pub fn range(&self) -> &str {
        match self {
            RangeError::Parse { range, .. } => range,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("target `{target}` of `{descriptor}` is not a dependency of any supported test")]
    TargetMissing { descriptor: String, target: String },

    #[error("invalid range for target `{target}` of `{descriptor}`: {source}")]
    InvalidRange {
        descriptor: String,
        target: String,
        #[source]
        source: RangeError,
    },
}

impl ResolveError {
    pub fn is_target_missing(&self) -> bool {
        matches!(self, ResolveError::TargetMissing { .. })
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited: retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Package not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
