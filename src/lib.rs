//! Minimum supported version discovery for instrumented modules.
//!
//! Versioned test trees describe, per instrumented module, which version ranges
//! the test suite exercises. This crate walks those trees, resolves the lowest
//! version each target module is tested against, enriches the result with
//! registry metadata and reduces everything to one sorted, deduplicated table.
//!
//! # Modules
//!
//! - [`config`]: Constants and the optional JSON configuration file
//! - [`descriptor`]: Test descriptor decoding and directory walking
//! - [`version`]: Range normalization, merging, target resolution and registries
//! - [`report`]: Concurrent enrichment, sorting and pruning of release data

pub mod config;
pub mod descriptor;
pub mod report;
pub mod version;
