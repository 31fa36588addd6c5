//! Expression parser
//!
//! Parses token sequences into Expression AST nodes.
//!
//! Grammar:
//! ```text
//! expr := term (OPERATOR term | POSTFIX)*
//! term := FIELD_REF | LITERAL | FUNCTION "(" (expr ("," expr)*)? ")" | "(" expr ")"
//! ```
//!
//! Binary operators chain left-to-right. In [`GroupingMode::Logical`] the
//! chain is first split on `OR`, then on `AND`, so
//! `{a} == 1 OR {b} == 2 AND {c} == 3` groups as `a OR (b AND c)`.
//! [`GroupingMode::Flat`] chains every operator, logical ones included, in
//! source order.

use crate::error::{ExpressionError, ParseError, ParseErrorKind};
use crate::lexer::{tokenize, Token, TokenKind};
use batchmap_core::ast::{Expression, Operator};
use batchmap_core::types::FieldCatalog;
use serde::{Deserialize, Serialize};

/// How binary operators associate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupingMode {
    /// `OR` binds loosest, then `AND`, then everything else left-to-right
    #[default]
    Logical,
    /// Every binary operator chains left-to-right
    Flat,
}

/// Default bound on tree height and on group/call nesting
pub const DEFAULT_MAX_NESTING: usize = 64;

/// Expression parser
#[derive(Debug, Clone, Copy)]
pub struct ExpressionParser<'a> {
    catalog: Option<&'a FieldCatalog>,
    mode: GroupingMode,
    max_nesting: usize,
}

impl Default for ExpressionParser<'_> {
    fn default() -> Self {
        Self {
            catalog: None,
            mode: GroupingMode::default(),
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }
}

impl<'a> ExpressionParser<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check field references against a catalog
    pub fn with_catalog(mut self, catalog: &'a FieldCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_mode(mut self, mode: GroupingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Bound the height of parsed trees and the nesting of groups and calls
    pub fn with_max_nesting(mut self, max_nesting: usize) -> Self {
        self.max_nesting = max_nesting;
        self
    }

    pub fn mode(&self) -> GroupingMode {
        self.mode
    }

    pub fn max_nesting(&self) -> usize {
        self.max_nesting
    }

    /// Tokenize and parse an expression source
    pub fn parse_str(&self, source: &str) -> Result<Expression, ExpressionError> {
        let tokens = tokenize(source)?;
        Ok(self.parse(&tokens)?)
    }

    /// Parse a complete token sequence
    pub fn parse(&self, tokens: &[Token]) -> Result<Expression, ParseError> {
        let mut cursor = Cursor::new(tokens);
        let node = self.parse_expression(&mut cursor)?;

        if let Some(token) = cursor.peek() {
            return Err(cursor.unexpected(token));
        }

        log::trace!(
            "parsed {} token(s) into a tree of height {}: {:?}",
            tokens.len(),
            node.height,
            node.expr
        );
        Ok(node.expr)
    }

    fn parse_expression(&self, cursor: &mut Cursor) -> Result<Node, ParseError> {
        match self.mode {
            GroupingMode::Logical => self.parse_or(cursor),
            GroupingMode::Flat => self.parse_chain(cursor, true),
        }
    }

    fn parse_or(&self, cursor: &mut Cursor) -> Result<Node, ParseError> {
        let mut left = self.parse_and(cursor)?;
        while let Some(position) = cursor.eat_operator(Operator::Or) {
            let right = self.parse_and(cursor)?;
            left = self.binary(left, Operator::Or, right, position)?;
        }
        Ok(left)
    }

    fn parse_and(&self, cursor: &mut Cursor) -> Result<Node, ParseError> {
        let mut left = self.parse_chain(cursor, false)?;
        while let Some(position) = cursor.eat_operator(Operator::And) {
            let right = self.parse_chain(cursor, false)?;
            left = self.binary(left, Operator::And, right, position)?;
        }
        Ok(left)
    }

    /// `term (OPERATOR term | POSTFIX)*`, stopping at `AND`/`OR` unless
    /// `include_logical` is set
    fn parse_chain(&self, cursor: &mut Cursor, include_logical: bool) -> Result<Node, ParseError> {
        let mut left = self.parse_term(cursor)?;

        loop {
            let (op, position) = match cursor.peek() {
                Some(Token {
                    kind: TokenKind::Operator(op),
                    span,
                }) if include_logical || !op.is_logical() => (*op, span.start),
                _ => break,
            };
            cursor.advance();

            left = if op.is_unary() {
                let height = self.check_height(left.height + 1, position)?;
                Node {
                    expr: Expression::unary(op, left.expr),
                    height,
                }
            } else {
                let right = self.parse_term(cursor)?;
                self.binary(left, op, right, position)?
            };
        }

        Ok(left)
    }

    fn parse_term(&self, cursor: &mut Cursor) -> Result<Node, ParseError> {
        let token = match cursor.peek() {
            Some(token) => token,
            None => return Err(cursor.end_of_input()),
        };

        match &token.kind {
            TokenKind::FieldRef(name) => {
                if let Some(catalog) = self.catalog {
                    if !catalog.contains(name) {
                        return Err(ParseError::new(
                            ParseErrorKind::UnknownField(name.clone()),
                            token.span.start,
                        ));
                    }
                }
                cursor.advance();
                Ok(Node::leaf(Expression::field(name.clone())))
            }
            TokenKind::Literal(value) => {
                cursor.advance();
                Ok(Node::leaf(Expression::Literal(value.clone())))
            }
            TokenKind::LParen => {
                cursor.enter(token.span.start, self.max_nesting)?;
                cursor.advance();
                let inner = self.parse_expression(cursor)?;
                cursor.expect_close(token.span.start)?;
                cursor.leave();
                Ok(inner)
            }
            TokenKind::Function(function) => {
                let function = *function;
                cursor.enter(token.span.start, self.max_nesting)?;
                cursor.advance();

                let open = match cursor.peek() {
                    Some(t) if t.kind == TokenKind::LParen => t.span.start,
                    Some(t) => return Err(cursor.unexpected(t)),
                    None => return Err(cursor.end_of_input()),
                };
                cursor.advance();

                let mut args = Vec::new();
                let mut height = 0;
                if cursor.peek().map(|t| &t.kind) == Some(&TokenKind::RParen) {
                    cursor.advance();
                } else {
                    loop {
                        let arg = self.parse_expression(cursor)?;
                        height = height.max(arg.height);
                        args.push(arg.expr);
                        if cursor.peek().map(|t| &t.kind) == Some(&TokenKind::Comma) {
                            cursor.advance();
                            continue;
                        }
                        cursor.expect_close(open)?;
                        break;
                    }
                }
                cursor.leave();

                let expected = function.signature().arity;
                if !expected.accepts(args.len()) {
                    return Err(ParseError::new(
                        ParseErrorKind::ArityMismatch {
                            function,
                            expected,
                            got: args.len(),
                        },
                        token.span.start,
                    ));
                }

                Ok(Node {
                    expr: Expression::call(function, args),
                    height: self.check_height(height + 1, token.span.start)?,
                })
            }
            TokenKind::Operator(_) | TokenKind::RParen | TokenKind::Comma => {
                Err(cursor.unexpected(token))
            }
        }
    }

    fn binary(
        &self,
        left: Node,
        op: Operator,
        right: Node,
        position: usize,
    ) -> Result<Node, ParseError> {
        let height = self.check_height(left.height.max(right.height) + 1, position)?;
        Ok(Node {
            expr: Expression::binary(left.expr, op, right.expr),
            height,
        })
    }

    fn check_height(&self, height: usize, position: usize) -> Result<usize, ParseError> {
        if height > self.max_nesting {
            return Err(self.too_deep(position));
        }
        Ok(height)
    }

    fn too_deep(&self, position: usize) -> ParseError {
        ParseError::new(
            ParseErrorKind::NestingTooDeep {
                max: self.max_nesting,
            },
            position,
        )
    }
}

/// Parsed subtree and its height
struct Node {
    expr: Expression,
    height: usize,
}

impl Node {
    fn leaf(expr: Expression) -> Self {
        Self { expr, height: 1 }
    }
}

/// Read position over a token slice
struct Cursor<'t> {
    tokens: &'t [Token],
    pos: usize,
    /// Open groups and calls
    depth: usize,
}

impl<'t> Cursor<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    /// Consume `op`, returning where it started
    fn eat_operator(&mut self, op: Operator) -> Option<usize> {
        match self.peek() {
            Some(token) if token.kind == TokenKind::Operator(op) => {
                self.advance();
                Some(token.span.start)
            }
            _ => None,
        }
    }

    /// Open a group or call at `position`
    fn enter(&mut self, position: usize, max: usize) -> Result<(), ParseError> {
        if self.depth >= max {
            return Err(ParseError::new(ParseErrorKind::NestingTooDeep { max }, position));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Consume the `)` closing the group opened at `open`
    fn expect_close(&mut self, open: usize) -> Result<(), ParseError> {
        match self.peek() {
            Some(token) if token.kind == TokenKind::RParen => {
                self.advance();
                Ok(())
            }
            Some(token) => Err(self.unexpected(token)),
            None => Err(ParseError::new(ParseErrorKind::UnterminatedGroup, open)),
        }
    }

    fn unexpected(&self, token: &Token) -> ParseError {
        ParseError::new(
            ParseErrorKind::UnexpectedToken(format!("'{}'", token.kind)),
            token.span.start,
        )
    }

    fn end_of_input(&self) -> ParseError {
        let position = self.tokens.last().map(|t| t.span.end).unwrap_or(0);
        ParseError::new(
            ParseErrorKind::UnexpectedToken("end of input".to_string()),
            position,
        )
    }
}
