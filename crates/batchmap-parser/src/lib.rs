//! batchmap Parser - source text to AST for the batchmap expression language
//!
//! This crate provides:
//! - The tokenizer (`{field}` references, literals, operators, functions)
//! - The expression parser, with catalog-aware field checks and arity checks
//! - The printer, rendering trees back to minimal source text
//! - The condition payload reader (JSON / YAML)

pub mod condition_parser;
pub mod error;
pub mod expression_parser;
pub mod lexer;
pub mod printer;

// Re-export main parser types
pub use condition_parser::ConditionParser;
pub use error::{
    ExpressionError, LexError, LexErrorReason, ParseError, ParseErrorKind, PayloadError, Result,
};
pub use expression_parser::{ExpressionParser, GroupingMode, DEFAULT_MAX_NESTING};
pub use lexer::{check_balance, tokenize, Span, Token, TokenKind};
pub use printer::to_source;

use batchmap_core::ast::Expression;

/// Tokenize and parse with default settings (no catalog, logical grouping)
pub fn parse(source: &str) -> Result<Expression> {
    ExpressionParser::new().parse_str(source)
}
