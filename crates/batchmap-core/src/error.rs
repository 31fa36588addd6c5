//! Error types for batchmap Core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Unknown data type: {0}")]
    UnknownDataType(String),

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("Unknown operator: {0}")]
    UnknownOperator(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
