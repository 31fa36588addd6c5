//! Runtime error types

use batchmap_core::NodePath;
use batchmap_parser::ExpressionError;
use thiserror::Error;

/// Evaluation error kinds
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalErrorKind {
    /// A value could not be read as the type a function needs
    #[error("Type coercion failed: {0}")]
    TypeCoercion(String),

    /// `TO_DATE` input did not match its format
    #[error("Cannot parse '{input}' as a date with format '{format}'")]
    DateParse { input: String, format: String },

    /// Condition nesting went past the configured bound
    #[error("Maximum condition depth exceeded: depth {depth}, max {max}")]
    MaxDepthExceeded { depth: usize, max: usize },

    /// A branch expression failed to parse during evaluation
    #[error("Invalid expression at {path}: {error}")]
    InvalidExpression {
        path: NodePath,
        error: ExpressionError,
    },
}

/// Evaluation error
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind}")]
pub struct EvalError {
    pub kind: EvalErrorKind,
}

impl EvalError {
    pub fn type_coercion(message: impl Into<String>) -> Self {
        EvalErrorKind::TypeCoercion(message.into()).into()
    }

    pub fn date_parse(input: impl Into<String>, format: impl Into<String>) -> Self {
        EvalErrorKind::DateParse {
            input: input.into(),
            format: format.into(),
        }
        .into()
    }

    pub fn max_depth(depth: usize, max: usize) -> Self {
        EvalErrorKind::MaxDepthExceeded { depth, max }.into()
    }

    pub fn invalid_expression(path: NodePath, error: ExpressionError) -> Self {
        EvalErrorKind::InvalidExpression { path, error }.into()
    }
}

impl From<EvalErrorKind> for EvalError {
    fn from(kind: EvalErrorKind) -> Self {
        Self { kind }
    }
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, EvalError>;
