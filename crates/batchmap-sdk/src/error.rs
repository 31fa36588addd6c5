//! SDK error types

use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Expression tokenize/parse error
    #[error("Expression error: {0}")]
    ExpressionError(#[from] batchmap_parser::ExpressionError),

    /// Condition payload could not be read
    #[error("Payload error: {0}")]
    PayloadError(#[from] batchmap_parser::PayloadError),

    /// Evaluation error
    #[error("Evaluation error: {0}")]
    EvalError(#[from] batchmap_runtime::EvalError),

    /// The external validation hook itself failed
    #[error("Validation hook error: {0}")]
    ValidationHook(String),

    /// Field mapping cannot be rendered
    #[error("Mapping error for field '{field}': {message}")]
    MappingError { field: String, message: String },
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
