//! Expression printer
//!
//! Renders an expression tree back to source text. Only the parentheses the
//! grouping mode needs are emitted, so the output re-parses to the same tree.

use crate::expression_parser::GroupingMode;
use crate::lexer::escape;
use batchmap_core::ast::{Expression, Operator};
use batchmap_core::types::Value;

// Binding levels, loosest first
const LEVEL_OR: u8 = 0;
const LEVEL_AND: u8 = 1;
const LEVEL_CHAIN: u8 = 2;
const LEVEL_TERM: u8 = 3;

/// Render an expression as source text
pub fn to_source(expr: &Expression, mode: GroupingMode) -> String {
    let mut out = String::new();
    write_expr(expr, mode, &mut out);
    out
}

fn operator_level(op: Operator, mode: GroupingMode) -> u8 {
    match (mode, op) {
        (GroupingMode::Logical, Operator::Or) => LEVEL_OR,
        (GroupingMode::Logical, Operator::And) => LEVEL_AND,
        _ => LEVEL_CHAIN,
    }
}

fn level(expr: &Expression, mode: GroupingMode) -> u8 {
    match expr {
        Expression::Binary { op, .. } => operator_level(*op, mode),
        Expression::Unary { .. } => LEVEL_CHAIN,
        _ => LEVEL_TERM,
    }
}

fn write_operand(expr: &Expression, min_level: u8, mode: GroupingMode, out: &mut String) {
    if level(expr, mode) < min_level {
        out.push('(');
        write_expr(expr, mode, out);
        out.push(')');
    } else {
        write_expr(expr, mode, out);
    }
}

fn write_expr(expr: &Expression, mode: GroupingMode, out: &mut String) {
    match expr {
        Expression::Literal(value) => write_literal(value, out),
        Expression::FieldRef(name) => {
            out.push('{');
            out.push_str(name);
            out.push('}');
        }
        Expression::Binary { left, op, right } => {
            // left-associative: the right operand must bind tighter
            let op_level = operator_level(*op, mode);
            write_operand(left, op_level, mode, out);
            out.push(' ');
            out.push_str(op.symbol());
            out.push(' ');
            write_operand(right, op_level + 1, mode, out);
        }
        Expression::Unary { op, operand } => {
            write_operand(operand, LEVEL_CHAIN, mode, out);
            out.push(' ');
            out.push_str(op.symbol());
        }
        Expression::FunctionCall { function, args } => {
            out.push_str(function.name());
            out.push('(');
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_expr(arg, mode, out);
            }
            out.push(')');
        }
    }
}

fn write_literal(value: &Value, out: &mut String) {
    match value {
        Value::String(s) => {
            out.push('"');
            out.push_str(&escape(s));
            out.push('"');
        }
        Value::Null => out.push_str("null"),
        other => out.push_str(&other.to_display_string()),
    }
}
