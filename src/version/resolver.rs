//! Minimum version resolution for the targets of a descriptor
//!
//! Every declared target is resolved on its own: the ranges of all supported
//! test cases that depend on the target are merged, and the lower boundary of
//! the winning range becomes the target's minimum supported version.

use serde::Serialize;
use tracing::debug;

use crate::descriptor::types::{Target, TestDescriptor};
use crate::version::error::ResolveError;
use crate::version::merge::{RangeMerger, is_range_lower};
use crate::version::range::VersionRange;

/// Minimum supported version of one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTarget {
    pub name: String,
    pub min_version: String,
    pub min_agent_version: String,
}

/// Outcome of resolving every target of one descriptor. A target either
/// appears in `resolved` or has an entry in `failures`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetResolution {
    pub resolved: Vec<ResolvedTarget>,
    pub failures: Vec<ResolveError>,
}

pub struct TargetResolver {
    merger: RangeMerger,
}

impl TargetResolver {
    pub fn new() -> Self {
        Self {
            merger: RangeMerger::new(),
        }
    }

    /// Resolve all declared targets of a descriptor
    pub fn resolve(&self, descriptor: &TestDescriptor) -> TargetResolution {
        let mut resolution = TargetResolution::default();

        for target in &descriptor.targets {
            match self.resolve_target(descriptor, target) {
                Ok(resolved) => {
                    debug!(
                        "Resolved {} to minimum version {} in {}",
                        resolved.name, resolved.min_version, descriptor.name
                    );
                    resolution.resolved.push(resolved);
                }
                Err(e) => resolution.failures.push(e),
            }
        }

        resolution
    }

    fn resolve_target(
        &self,
        descriptor: &TestDescriptor,
        target: &Target,
    ) -> Result<ResolvedTarget, ResolveError> {
        let mut lowest: Option<VersionRange> = None;

        let declarations = descriptor
            .tests
            .iter()
            .filter(|test| test.supported)
            .filter_map(|test| test.dependencies.get(&target.name));

        for dependency in declarations {
            let candidate = self
                .merger
                .merge_expression(&dependency.versions)
                .map_err(|source| ResolveError::InvalidRange {
                    descriptor: descriptor.name.clone(),
                    target: target.name.clone(),
                    source,
                })?;

            lowest = match lowest {
                Some(current) if !is_range_lower(&candidate, &current) => Some(current),
                _ => Some(candidate),
            };
        }

        let lowest = lowest.ok_or_else(|| ResolveError::TargetMissing {
            descriptor: descriptor.name.clone(),
            target: target.name.clone(),
        })?;

        Ok(ResolvedTarget {
            name: target.name.clone(),
            min_version: lowest.min_version(),
            min_agent_version: target.min_agent_version.clone(),
        })
    }
}

impl Default for TargetResolver {
    fn default() -> Self {
        Self::new()
    }
}
