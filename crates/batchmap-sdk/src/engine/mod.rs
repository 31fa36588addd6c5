//! Engine - Main API for checking and evaluating conditions
//!
//! This module provides the `Engine` facade used by the mapping builder.
//!
//! # Architecture
//!
//! The module is organized into:
//! - `types`: Test case request/result types
//! - `engine`: Core Engine implementation (parse cache, evaluation, validation)
//! - `tests`: Unit tests (test-only)

mod engine;
mod types;

// Re-export public types
pub use engine::Engine;
pub use types::{TestCase, TestCaseResult};

// Tests module (only compiled in test mode)
#[cfg(test)]
mod tests;
