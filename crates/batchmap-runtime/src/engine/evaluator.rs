//! Expression evaluator
//!
//! Evaluates a parsed expression tree against one record. Evaluation is a
//! pure function of the tree and the record: fields missing from the record
//! read as Null, and only function coercion failures are errors.

use super::operators::{call_function, execute_binary_op, execute_unary_op};
use crate::error::Result;
use batchmap_core::ast::{Expression, Operator};
use batchmap_core::{Record, Value};

/// Evaluate an expression against a record
pub fn evaluate(expr: &Expression, record: &Record) -> Result<Value> {
    match expr {
        Expression::Literal(value) => Ok(value.clone()),

        Expression::FieldRef(name) => Ok(match record.get(name) {
            Some(value) => value.clone(),
            None => {
                tracing::trace!("Field '{}' not in record, reading as Null", name);
                Value::Null
            }
        }),

        Expression::Binary {
            left,
            op: Operator::And,
            right,
        } => {
            if !evaluate(left, record)?.is_truthy() {
                return Ok(Value::Bool(false));
            }
            Ok(Value::Bool(evaluate(right, record)?.is_truthy()))
        }

        Expression::Binary {
            left,
            op: Operator::Or,
            right,
        } => {
            if evaluate(left, record)?.is_truthy() {
                return Ok(Value::Bool(true));
            }
            Ok(Value::Bool(evaluate(right, record)?.is_truthy()))
        }

        Expression::Binary { left, op, right } => {
            let left = evaluate(left, record)?;
            let right = evaluate(right, record)?;
            Ok(execute_binary_op(&left, *op, &right))
        }

        Expression::Unary { op, operand } => {
            let operand = evaluate(operand, record)?;
            Ok(execute_unary_op(&operand, *op))
        }

        Expression::FunctionCall { function, args } => {
            let args = args
                .iter()
                .map(|arg| evaluate(arg, record))
                .collect::<Result<Vec<_>>>()?;
            call_function(*function, &args)
        }
    }
}

/// Evaluate an expression as a condition (truthiness of its value)
pub fn evaluate_truthy(expr: &Expression, record: &Record) -> Result<bool> {
    Ok(evaluate(expr, record)?.is_truthy())
}
