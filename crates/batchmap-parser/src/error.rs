//! Parser error types

use batchmap_core::ast::{Arity, Function};
use thiserror::Error;

/// Why the tokenizer rejected its input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexErrorReason {
    #[error("unbalanced parentheses")]
    UnbalancedParentheses,

    #[error("unterminated field reference")]
    UnterminatedFieldRef,

    #[error("empty field reference")]
    EmptyFieldRef,

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),
}

/// Tokenizer error at a byte offset of the source
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason} at position {position}")]
pub struct LexError {
    pub position: usize,
    pub reason: LexErrorReason,
}

impl LexError {
    pub fn new(position: usize, reason: LexErrorReason) -> Self {
        Self { position, reason }
    }
}

/// Parser error kinds
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A token (or the end of input) appeared where it is not allowed
    #[error("unexpected {0}")]
    UnexpectedToken(String),

    /// Field reference not present in the catalog
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// Wrong number of function arguments
    #[error("{function} expects {expected} argument(s), got {got}")]
    ArityMismatch {
        function: Function,
        expected: Arity,
        got: usize,
    },

    /// An opening parenthesis was never closed
    #[error("unterminated group")]
    UnterminatedGroup,

    /// Groups, calls or operator chains nest past the parser's bound
    #[error("expression nests deeper than {max} levels")]
    NestingTooDeep { max: usize },
}

/// Parser error at a byte offset of the source
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at position {position}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, position: usize) -> Self {
        Self { kind, position }
    }
}

/// Any failure turning source text into an expression tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpressionError {
    #[error("Lex error: {0}")]
    Lex(#[from] LexError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

impl ExpressionError {
    /// Byte offset of the failure in the source
    pub fn position(&self) -> usize {
        match self {
            ExpressionError::Lex(e) => e.position,
            ExpressionError::Parse(e) => e.position,
        }
    }
}

/// Failure reading a condition payload document
#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ExpressionError>;
