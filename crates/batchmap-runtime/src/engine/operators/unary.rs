//! Unary operator execution

use batchmap_core::ast::Operator;
use batchmap_core::Value;

/// Execute a postfix unary operation (`IS_EMPTY`, `IS_NOT_EMPTY`)
pub(crate) fn execute_unary_op(operand: &Value, op: Operator) -> Value {
    match op {
        Operator::IsEmpty => Value::Bool(operand.is_empty()),
        Operator::IsNotEmpty => Value::Bool(!operand.is_empty()),
        _ => {
            tracing::debug!("Operator {} is not a unary operator", op);
            Value::Bool(false)
        }
    }
}
