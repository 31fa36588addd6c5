//! Comparison operator execution

use batchmap_core::ast::Operator;
use batchmap_core::Value;
use std::cmp::Ordering;

/// Execute a comparison operation (`==`, `!=`, `>`, `<`, `>=`, `<=`)
pub(crate) fn execute_compare(left: &Value, op: Operator, right: &Value) -> bool {
    // Null is only equal to Null and never ordered
    if left.is_null() || right.is_null() {
        let both_null = left.is_null() && right.is_null();
        let result = match op {
            Operator::Eq => both_null,
            Operator::Ne => !both_null,
            _ => false,
        };
        tracing::debug!(
            "Null comparison: {:?} {} {:?}, returning {}",
            left,
            op,
            right,
            result
        );
        return result;
    }

    if let (Value::Bool(l), Value::Bool(r)) = (left, right) {
        match op {
            Operator::Eq => return l == r,
            Operator::Ne => return l != r,
            _ => {}
        }
    }

    let ordering = match (left.as_number(), right.as_number()) {
        (Some(l), Some(r)) => l.partial_cmp(&r),
        _ => Some(left.to_display_string().cmp(&right.to_display_string())),
    };

    match (op, ordering) {
        (Operator::Eq, Some(o)) => o == Ordering::Equal,
        (Operator::Ne, Some(o)) => o != Ordering::Equal,
        (Operator::Gt, Some(o)) => o == Ordering::Greater,
        (Operator::Lt, Some(o)) => o == Ordering::Less,
        (Operator::Ge, Some(o)) => o != Ordering::Less,
        (Operator::Le, Some(o)) => o != Ordering::Greater,
        (Operator::Ne, None) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_coercion() {
        assert!(execute_compare(&Value::string("20"), Operator::Ge, &Value::Number(18.0)));
        assert!(execute_compare(&Value::string("1.0"), Operator::Eq, &Value::string("1")));
        // numeric, not lexicographic
        assert!(execute_compare(&Value::string("9"), Operator::Lt, &Value::string("10")));
    }

    #[test]
    fn test_string_fallback() {
        assert!(execute_compare(&Value::string("abc"), Operator::Lt, &Value::string("abd")));
        assert!(execute_compare(&Value::string("10"), Operator::Ne, &Value::string("ten")));
        assert!(execute_compare(&Value::string("true"), Operator::Eq, &Value::Bool(true)));
    }

    #[test]
    fn test_null_comparisons() {
        assert!(execute_compare(&Value::Null, Operator::Eq, &Value::Null));
        assert!(!execute_compare(&Value::Null, Operator::Ne, &Value::Null));
        assert!(!execute_compare(&Value::Null, Operator::Eq, &Value::string("")));
        assert!(execute_compare(&Value::Null, Operator::Ne, &Value::string("x")));
        assert!(!execute_compare(&Value::Null, Operator::Lt, &Value::Number(1.0)));
        assert!(!execute_compare(&Value::Number(1.0), Operator::Ge, &Value::Null));
    }

    #[test]
    fn test_bool_equality() {
        assert!(execute_compare(&Value::Bool(true), Operator::Eq, &Value::Bool(true)));
        assert!(execute_compare(&Value::Bool(true), Operator::Ne, &Value::Bool(false)));
    }
}
