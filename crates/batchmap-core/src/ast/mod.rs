//! Abstract Syntax Tree (AST) definitions for batchmap
//!
//! This module contains the AST node definitions for:
//! - Expressions
//! - Operators
//! - Built-in functions and their signatures

pub mod expression;
pub mod function;
pub mod operator;

pub use expression::Expression;
pub use function::{Arity, Function, Signature};
pub use operator::Operator;
