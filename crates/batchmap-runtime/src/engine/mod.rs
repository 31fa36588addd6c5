//! Evaluation engine module
//!
//! Provides the expression evaluator and the condition tree evaluator.

pub mod condition_evaluator;
pub mod evaluator;
mod operators;

// Re-export for convenience
pub use condition_evaluator::{
    ConditionEvaluator, ConditionOutcome, EvalState, EvalWarning, ExpressionProvider,
    ParseOnDemand,
};
pub use evaluator::{evaluate, evaluate_truthy};
