//! Built-in function execution

use super::date::parse_date;
use crate::error::{EvalError, Result};
use batchmap_core::ast::Function;
use batchmap_core::Value;

static NULL: Value = Value::Null;

/// Call a built-in function on already evaluated arguments.
///
/// Arity was checked at parse time; a missing argument reads as Null.
pub(crate) fn call_function(function: Function, args: &[Value]) -> Result<Value> {
    let arg = |i: usize| args.get(i).unwrap_or(&NULL);

    let value = match function {
        Function::Upper => Value::String(arg(0).to_display_string().to_uppercase()),
        Function::Lower => Value::String(arg(0).to_display_string().to_lowercase()),
        Function::Trim => Value::String(arg(0).to_display_string().trim().to_string()),
        Function::Length => Value::Number(arg(0).to_display_string().chars().count() as f64),
        Function::Substring => {
            let start = numeric_arg(function, "start", arg(1))?;
            let len = numeric_arg(function, "length", arg(2))?;
            Value::String(substring(&arg(0).to_display_string(), start, len))
        }
        Function::Concat => Value::String(args.iter().map(Value::to_display_string).collect()),
        Function::ToNumber => match arg(0) {
            Value::Null => Value::Null,
            other => match other.as_number() {
                Some(n) => Value::Number(n),
                None => {
                    return Err(EvalError::type_coercion(format!(
                        "TO_NUMBER cannot convert {} '{}'",
                        other.type_name(),
                        other
                    )))
                }
            },
        },
        Function::ToDate => match arg(0) {
            Value::Null => Value::Null,
            other => Value::String(parse_date(
                &other.to_display_string(),
                &arg(1).to_display_string(),
            )?),
        },
    };

    tracing::trace!("{}({:?}) = {:?}", function, args, value);
    Ok(value)
}

fn numeric_arg(function: Function, name: &str, value: &Value) -> Result<f64> {
    value.as_number().ok_or_else(|| {
        EvalError::type_coercion(format!(
            "{} {} must be numeric, got {} '{}'",
            function,
            name,
            value.type_name(),
            value
        ))
    })
}

/// Character-based, 0-indexed substring with clamped bounds
fn substring(s: &str, start: f64, len: f64) -> String {
    let start = start.max(0.0) as usize;
    let len = len.max(0.0) as usize;
    s.chars().skip(start).take(len).collect()
}
