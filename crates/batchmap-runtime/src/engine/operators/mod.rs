//! Operator and function execution
//!
//! This module contains the value-level semantics used by the evaluator.

mod binary;
mod comparison;
mod date;
mod functions;
mod unary;

pub(crate) use binary::execute_binary_op;
pub(crate) use functions::call_function;
pub(crate) use unary::execute_unary_op;
