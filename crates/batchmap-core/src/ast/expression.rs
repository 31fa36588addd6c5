//! Expression AST nodes

use super::function::Function;
use super::operator::Operator;
use crate::types::Value;
use serde::{Deserialize, Serialize};

/// Expression AST node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Literal value
    Literal(Value),

    /// Field reference (`{fieldName}`), resolved against a record at evaluation time
    FieldRef(String),

    /// Binary operation
    Binary {
        left: Box<Expression>,
        op: Operator,
        right: Box<Expression>,
    },

    /// Postfix unary operation (`IS_EMPTY`, `IS_NOT_EMPTY`)
    Unary {
        op: Operator,
        operand: Box<Expression>,
    },

    /// Function call
    FunctionCall {
        function: Function,
        args: Vec<Expression>,
    },
}

impl Expression {
    /// Create a literal expression
    pub fn literal(value: impl Into<Value>) -> Self {
        Expression::Literal(value.into())
    }

    /// Create a field reference expression
    pub fn field(name: impl Into<String>) -> Self {
        Expression::FieldRef(name.into())
    }

    /// Create a binary expression
    pub fn binary(left: Expression, op: Operator, right: Expression) -> Self {
        Expression::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Create a postfix unary expression
    pub fn unary(op: Operator, operand: Expression) -> Self {
        Expression::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Create a function call expression
    pub fn call(function: Function, args: Vec<Expression>) -> Self {
        Expression::FunctionCall { function, args }
    }

    /// Names of all referenced fields, in source order (duplicates kept)
    pub fn field_refs(&self) -> Vec<&str> {
        let mut refs = Vec::new();
        self.collect_field_refs(&mut refs);
        refs
    }

    fn collect_field_refs<'a>(&'a self, refs: &mut Vec<&'a str>) {
        match self {
            Expression::Literal(_) => {}
            Expression::FieldRef(name) => refs.push(name),
            Expression::Binary { left, right, .. } => {
                left.collect_field_refs(refs);
                right.collect_field_refs(refs);
            }
            Expression::Unary { operand, .. } => operand.collect_field_refs(refs),
            Expression::FunctionCall { args, .. } => {
                for arg in args {
                    arg.collect_field_refs(refs);
                }
            }
        }
    }
}
