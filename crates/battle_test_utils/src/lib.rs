//! # Battle Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Determinism test harness
//! - Fixture builders for templates, catalogs and armies
//! - Scripted attack-decision policies
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod determinism;
pub mod fixtures;
pub mod policies;

/// Re-export proptest for convenience.
pub use proptest;
