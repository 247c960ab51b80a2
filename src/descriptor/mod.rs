//! Descriptor layer
//! - types.rs: Test descriptor, test case and dependency types
//! - walker.rs: Streaming walk over versioned test trees
//! - error.rs: Decode and walk errors

pub mod error;
pub mod types;
pub mod walker;

pub use error::{DependencyError, DescriptorError, WalkError};
pub use types::{DependencySpec, Target, TestCase, TestDescriptor, parse_descriptor};
pub use walker::{WalkEntry, WalkResult, spawn_walk, walk_test_dir};
