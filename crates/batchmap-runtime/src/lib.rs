//! batchmap Runtime - Evaluation of batchmap expressions and condition trees
//!
//! This crate evaluates parsed expressions against source records and
//! selects branches of nested IF / ELSE-IF / ELSE condition trees.

pub mod engine;
pub mod error;

// Re-export main types
pub use engine::{
    evaluate, evaluate_truthy, ConditionEvaluator, ConditionOutcome, EvalState, EvalWarning,
    ExpressionProvider, ParseOnDemand,
};
pub use error::{EvalError, EvalErrorKind, Result};
