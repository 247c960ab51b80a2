//! Registry implementations for fetching release metadata

pub mod npm;

pub use npm::NpmRegistry;
