//! Expression tokenizer
//!
//! Turns expression source into a flat list of spanned tokens:
//! - Field references: `{amount}`, `{ first name }` (name is trimmed)
//! - Quoted literals: `"active"`, `"say \"hi\""`
//! - Symbolic operators: `==`, `!=`, `>=`, `<=`, `>`, `<`
//! - Bare words: keyword operators (`CONTAINS`, `AND`, ...), function names,
//!   `true`/`false`/`null`, numbers, and otherwise plain string literals
//! - `(`, `)` and `,`
//!
//! Spans are byte offsets into the source. Whitespace between tokens is dropped.

use crate::error::{LexError, LexErrorReason};
use batchmap_core::ast::{Function, Operator};
use batchmap_core::types::Value;
use std::fmt;

/// Byte range of a token in its source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    FieldRef(String),
    Literal(Value),
    Operator(Operator),
    Function(Function),
    LParen,
    RParen,
    Comma,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::FieldRef(name) => write!(f, "{{{}}}", name),
            TokenKind::Literal(Value::String(s)) => write!(f, "\"{}\"", escape(s)),
            TokenKind::Literal(value) => write!(f, "{}", value),
            TokenKind::Operator(op) => write!(f, "{}", op),
            TokenKind::Function(function) => write!(f, "{}", function),
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::Comma => f.write_str(","),
        }
    }
}

/// Escape a string for use inside a quoted literal
pub(crate) fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Tokenize an expression source
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    check_balance(source)?;

    let chars: Vec<(usize, char)> = source.char_indices().collect();
    let end_of = |i: usize| chars.get(i).map(|&(pos, _)| pos).unwrap_or(source.len());
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (start, c) = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '(' => {
                tokens.push(Token::new(TokenKind::LParen, start, start + 1));
                i += 1;
            }
            ')' => {
                tokens.push(Token::new(TokenKind::RParen, start, start + 1));
                i += 1;
            }
            ',' => {
                tokens.push(Token::new(TokenKind::Comma, start, start + 1));
                i += 1;
            }
            '{' => {
                let close = chars[i + 1..]
                    .iter()
                    .position(|&(_, c)| c == '}')
                    .map(|offset| i + 1 + offset)
                    .ok_or_else(|| LexError::new(start, LexErrorReason::UnterminatedFieldRef))?;

                let name = source[start + 1..chars[close].0].trim();
                if name.is_empty() {
                    return Err(LexError::new(start, LexErrorReason::EmptyFieldRef));
                }
                tokens.push(Token::new(
                    TokenKind::FieldRef(name.to_string()),
                    start,
                    chars[close].0 + 1,
                ));
                i = close + 1;
            }
            '"' => {
                let mut literal = String::new();
                i += 1;
                loop {
                    match chars.get(i) {
                        None => {
                            return Err(LexError::new(start, LexErrorReason::UnterminatedString))
                        }
                        Some(&(_, '\\')) => match chars.get(i + 1) {
                            Some(&(_, escaped @ ('"' | '\\'))) => {
                                literal.push(escaped);
                                i += 2;
                            }
                            _ => {
                                literal.push('\\');
                                i += 1;
                            }
                        },
                        Some(&(_, '"')) => break,
                        Some(&(_, c)) => {
                            literal.push(c);
                            i += 1;
                        }
                    }
                }
                tokens.push(Token::new(
                    TokenKind::Literal(Value::String(literal)),
                    start,
                    end_of(i + 1),
                ));
                i += 1;
            }
            '=' | '!' | '<' | '>' => {
                let next = chars.get(i + 1).map(|&(_, c)| c);
                let (op, width) = match (c, next) {
                    ('=', Some('=')) => (Operator::Eq, 2),
                    ('!', Some('=')) => (Operator::Ne, 2),
                    ('>', Some('=')) => (Operator::Ge, 2),
                    ('<', Some('=')) => (Operator::Le, 2),
                    ('>', _) => (Operator::Gt, 1),
                    ('<', _) => (Operator::Lt, 1),
                    _ => {
                        return Err(LexError::new(
                            start,
                            LexErrorReason::UnexpectedCharacter(c),
                        ))
                    }
                };
                tokens.push(Token::new(TokenKind::Operator(op), start, start + width));
                i += width;
            }
            c if is_word_char(c) => {
                while i < chars.len() && is_word_char(chars[i].1) {
                    i += 1;
                }
                let end = end_of(i);
                let kind = classify_word(&source[start..end]);
                log::trace!("word '{}' at {}..{} -> {:?}", &source[start..end], start, end, kind);
                tokens.push(Token::new(kind, start, end));
            }
            other => {
                return Err(LexError::new(
                    start,
                    LexErrorReason::UnexpectedCharacter(other),
                ))
            }
        }
    }

    log::trace!("tokenized {} token(s) from '{}'", tokens.len(), source);
    Ok(tokens)
}

/// Characters that may appear in a bare word
fn is_word_char(c: char) -> bool {
    !c.is_whitespace()
        && !matches!(
            c,
            '"' | '{' | '}' | '(' | ')' | ',' | '=' | '!' | '<' | '>'
        )
}

fn classify_word(word: &str) -> TokenKind {
    if let Some(op) = Operator::from_symbol(word).filter(Operator::is_keyword) {
        return TokenKind::Operator(op);
    }
    if let Some(function) = Function::from_name(word) {
        return TokenKind::Function(function);
    }
    match word {
        "true" => TokenKind::Literal(Value::Bool(true)),
        "false" => TokenKind::Literal(Value::Bool(false)),
        "null" => TokenKind::Literal(Value::Null),
        _ => match word.parse::<f64>() {
            Ok(n) if n.is_finite() => TokenKind::Literal(Value::Number(n)),
            _ => TokenKind::Literal(Value::String(word.to_string())),
        },
    }
}

/// Parenthesis pre-check, ignoring parentheses inside quoted literals.
///
/// Stricter than comparing counts: order is checked too, so `)(` fails here
/// as unbalanced instead of reaching the parser as an unexpected `)`.
/// Reports the first `)` with no opener, or else the first `(` left open.
pub fn check_balance(source: &str) -> Result<(), LexError> {
    let mut open: Vec<usize> = Vec::new();
    let mut in_quote = false;
    let mut escaped = false;

    for (pos, c) in source.char_indices() {
        if in_quote {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_quote = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_quote = true,
            '(' => open.push(pos),
            ')' => {
                if open.pop().is_none() {
                    return Err(LexError::new(pos, LexErrorReason::UnbalancedParentheses));
                }
            }
            _ => {}
        }
    }

    match open.first() {
        Some(&pos) => Err(LexError::new(pos, LexErrorReason::UnbalancedParentheses)),
        None => Ok(()),
    }
}
