//! Binary operator execution

use super::comparison::execute_compare;
use batchmap_core::ast::Operator;
use batchmap_core::Value;

/// Execute a non-logical binary operation.
///
/// `AND`/`OR` short-circuit and are handled by the evaluator itself.
pub(crate) fn execute_binary_op(left: &Value, op: Operator, right: &Value) -> Value {
    if op.is_comparison() {
        return Value::Bool(execute_compare(left, op, right));
    }

    // String matching on Null never holds
    if left.is_null() || right.is_null() {
        tracing::debug!(
            "Null in string match: {:?} {} {:?}, returning false",
            left,
            op,
            right
        );
        return Value::Bool(false);
    }

    let l = left.to_display_string();
    let r = right.to_display_string();

    let result = match op {
        Operator::Contains => l.contains(r.as_str()),
        Operator::StartsWith => l.starts_with(r.as_str()),
        Operator::EndsWith => l.ends_with(r.as_str()),
        _ => {
            tracing::debug!("Operator {} is not a binary value operator", op);
            false
        }
    };
    Value::Bool(result)
}
