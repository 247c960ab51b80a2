//! Version layer: range handling, target resolution and registry access
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Normalizer  │────▶│   Merger    │────▶│  Resolver   │
//! │ (cleanup)   │     │(lowest rng) │     │ (targets)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │
//!                            ▼
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │    Range    │     │  Registry   │
//!                     │ (boundaries)│     │  (fetch)    │
//!                     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`normalize`]: Rewrites hand-written ranges into the parseable grammar
//! - [`range`]: Range parsing into lower and upper boundaries
//! - [`merge`]: Picks the range with the lowest minimum version
//! - [`resolver`]: Resolves the minimum version of every descriptor target
//! - [`registry`]: Registry trait for fetching release metadata
//! - [`registries`]: Concrete registry implementations (npm)
//! - [`error`]: Error types for ranges, resolution and registries
//! - [`semver`]: Shared semver utilities

pub mod error;
pub mod merge;
pub mod normalize;
pub mod range;
pub mod registries;
pub mod registry;
pub mod resolver;
pub mod semver;
