//! # Consist Test Utilities
//!
//! Shared testing utilities for the workspace:
//! - Determinism test harness
//! - Catalog and vehicle fixtures
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod determinism;
pub mod fixtures;

/// Re-export proptest for convenience.
pub use proptest;
