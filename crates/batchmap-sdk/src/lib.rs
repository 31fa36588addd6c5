//! batchmap SDK
//!
//! High-level API for checking, testing and evaluating the conditional
//! expressions behind fixed-width batch field mappings.

pub mod builder;
pub mod config;
pub mod engine;
pub mod error;
pub mod hook;
pub mod mapping;
pub mod validator;

// Re-export main types
pub use builder::EngineBuilder;
pub use config::EngineConfig;
pub use engine::{Engine, TestCase, TestCaseResult};
pub use error::{Result, SdkError};
pub use hook::{ExpressionHook, HookVerdict};
pub use mapping::{CompositeSource, CompositeTransform, FieldMapping, Pad, TransformationType};
pub use validator::{
    quick_check, validate, ConditionValidator, IssueCode, Severity, ValidationIssue,
    ValidationReport,
};

// Re-export commonly used types from dependencies
pub use batchmap_core::{CatalogField, Condition, DataType, FieldCatalog, NodePath, Record, Value, ValueSource};
pub use batchmap_parser::GroupingMode;
pub use batchmap_runtime::{ConditionOutcome, EvalState, EvalWarning};
