//! batchmap Core - Core types for the batchmap conditional expression language
//!
//! This crate provides the fundamental types shared by the parser, runtime and SDK:
//! - Value types for record data and evaluation results
//! - The field catalog (schema) used for parse-time validation
//! - AST definitions for expressions, operators and functions
//! - The nested IF / ELSE-IF / ELSE condition payload
//! - Error types

pub mod ast;
pub mod condition;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use condition::{Condition, NodePath, ValueSource};
pub use error::CoreError;
pub use types::{CatalogField, DataType, FieldCatalog, Record, Value};
