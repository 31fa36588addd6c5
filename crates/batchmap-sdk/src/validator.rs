//! Condition Validation Module
//!
//! Checks every expression of a condition tree without evaluating anything,
//! collecting all problems instead of stopping at the first one.
//!
//! # Example
//!
//! ```rust,ignore
//! use batchmap_sdk::validator::validate;
//!
//! let report = validate(&condition, &catalog);
//! if !report.valid {
//!     for error in &report.errors {
//!         println!("{}: {}", error.path, error.message);
//!     }
//! }
//! ```

use batchmap_core::ast::Expression;
use batchmap_core::condition::{Condition, NodePath, ValueSource, DEFAULT_MAX_DEPTH};
use batchmap_core::types::{DataType, FieldCatalog, Value};
use batchmap_parser::{
    tokenize, ExpressionError, ExpressionParser, GroupingMode, ParseErrorKind, TokenKind,
};
use serde::{Deserialize, Serialize};

/// Severity level for validation issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Kind of validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    // Errors
    /// Tokenizer rejected the source
    Syntax,
    UnexpectedToken,
    UnknownField,
    ArityMismatch,
    UnterminatedGroup,
    /// Expression nests past the parser's bound
    NestingTooDeep,
    /// `ifExpr` is blank
    EmptyCondition,
    MaxDepthExceeded,
    /// The external validation hook rejected an expression
    ExternalRejected,

    // Warnings
    /// Root (or nested value) condition has no `elseExpr`
    MissingElse,
    /// An else-if entry carries an `elseExpr` that is never used
    IgnoredElse,
    EmptyThen,
    TypeMismatch,
}

impl IssueCode {
    pub fn severity(&self) -> Severity {
        match self {
            IssueCode::MissingElse
            | IssueCode::IgnoredElse
            | IssueCode::EmptyThen
            | IssueCode::TypeMismatch => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Location in the condition payload (`elseIfExprs[1].then`)
    pub path: NodePath,

    pub code: IssueCode,

    /// Human-readable message
    pub message: String,

    /// Byte offset in the expression source, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

impl ValidationIssue {
    pub fn new(path: NodePath, code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            path,
            code,
            message: message.into(),
            position: None,
        }
    }

    pub fn with_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    fn from_expression_error(path: NodePath, error: &ExpressionError) -> Self {
        let code = match error {
            ExpressionError::Lex(_) => IssueCode::Syntax,
            ExpressionError::Parse(e) => match e.kind {
                ParseErrorKind::UnexpectedToken(_) => IssueCode::UnexpectedToken,
                ParseErrorKind::UnknownField(_) => IssueCode::UnknownField,
                ParseErrorKind::ArityMismatch { .. } => IssueCode::ArityMismatch,
                ParseErrorKind::UnterminatedGroup => IssueCode::UnterminatedGroup,
                ParseErrorKind::NestingTooDeep { .. } => IssueCode::NestingTooDeep,
            },
        };
        let message = match error {
            ExpressionError::Lex(e) => e.reason.to_string(),
            ExpressionError::Parse(e) => e.kind.to_string(),
        };
        Self::new(path, code, message).with_position(error.position())
    }
}

/// Outcome of validating a condition tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Record an issue under errors or warnings by its severity
    pub fn push(&mut self, issue: ValidationIssue) {
        match issue.severity() {
            Severity::Error => {
                self.valid = false;
                self.errors.push(issue);
            }
            Severity::Warning => self.warnings.push(issue),
        }
    }

    /// Issues with the given code, errors first
    pub fn issues_with(&self, code: IssueCode) -> impl Iterator<Item = &ValidationIssue> {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .filter(move |issue| issue.code == code)
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// An expression that passed validation, with where it was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CheckedExpression {
    pub path: NodePath,
    pub source: String,
}

/// How a condition node is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeRole {
    /// Root or nested `then`/`elseExpr` condition; its `elseExpr` is used
    Full,
    /// Entry of `elseIfExprs`; its `elseExpr` is ignored
    ElseIf,
}

/// Condition tree validator
#[derive(Debug, Clone, Copy)]
pub struct ConditionValidator<'a> {
    catalog: &'a FieldCatalog,
    max_depth: usize,
    mode: GroupingMode,
}

impl<'a> ConditionValidator<'a> {
    pub fn new(catalog: &'a FieldCatalog) -> Self {
        Self {
            catalog,
            max_depth: DEFAULT_MAX_DEPTH,
            mode: GroupingMode::Logical,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_mode(mut self, mode: GroupingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Validate a whole condition tree
    pub fn validate(&self, condition: &Condition) -> ValidationReport {
        self.validate_collect(condition).0
    }

    /// Validate, also returning every expression that passed
    pub(crate) fn validate_collect(
        &self,
        condition: &Condition,
    ) -> (ValidationReport, Vec<CheckedExpression>) {
        let mut walk = Walk {
            validator: self,
            report: ValidationReport::new(),
            checked: Vec::new(),
        };
        walk.node(condition, 0, NodePath::root(), NodeRole::Full);

        tracing::debug!(
            "Validated condition: {} error(s), {} warning(s)",
            walk.report.errors.len(),
            walk.report.warnings.len()
        );
        (walk.report, walk.checked)
    }

    /// An empty catalog disables field checks
    fn parser(&self) -> ExpressionParser<'a> {
        let parser = ExpressionParser::new().with_mode(self.mode);
        if self.catalog.is_empty() {
            parser
        } else {
            parser.with_catalog(self.catalog)
        }
    }
}

/// Pre-order traversal state
struct Walk<'v, 'a> {
    validator: &'v ConditionValidator<'a>,
    report: ValidationReport,
    checked: Vec<CheckedExpression>,
}

impl Walk<'_, '_> {
    fn node(&mut self, condition: &Condition, depth: usize, path: NodePath, role: NodeRole) {
        let max = self.validator.max_depth;
        if depth >= max {
            self.report.push(ValidationIssue::new(
                path,
                IssueCode::MaxDepthExceeded,
                format!("condition at depth {} exceeds the maximum depth of {}", depth, max),
            ));
            return;
        }

        // ifExpr
        let if_path = path.if_expr();
        if condition.if_expr.trim().is_empty() {
            self.report.push(ValidationIssue::new(
                if_path,
                IssueCode::EmptyCondition,
                "condition expression is empty",
            ));
        } else {
            self.expression(&condition.if_expr, if_path);
        }

        // then
        let then_path = path.then();
        match &condition.then {
            Some(ValueSource::Expression(source)) if !source.trim().is_empty() => {
                self.expression(source, then_path)
            }
            Some(ValueSource::Nested(nested)) => {
                self.node(nested, depth + 1, then_path, NodeRole::Full)
            }
            _ => self.report.push(ValidationIssue::new(
                then_path,
                IssueCode::EmptyThen,
                "no value for the THEN branch; it resolves to null",
            )),
        }

        // else-ifs
        for (i, branch) in condition.else_ifs().iter().enumerate() {
            self.node(branch, depth, path.else_if(i), NodeRole::ElseIf);
        }

        // elseExpr
        let else_path = path.else_expr();
        match (&condition.else_expr, role) {
            (Some(_), NodeRole::ElseIf) => self.report.push(ValidationIssue::new(
                else_path,
                IssueCode::IgnoredElse,
                "ELSE on an else-if entry is never used; only the root ELSE applies",
            )),
            (None, NodeRole::Full) => self.report.push(ValidationIssue::new(
                else_path,
                IssueCode::MissingElse,
                "no ELSE branch; the default value is used when nothing matches",
            )),
            (Some(ValueSource::Expression(source)), NodeRole::Full) => {
                if !source.trim().is_empty() {
                    self.expression(source, else_path);
                }
            }
            (Some(ValueSource::Nested(nested)), NodeRole::Full) => {
                self.node(nested, depth + 1, else_path, NodeRole::Full)
            }
            (None, NodeRole::ElseIf) => {}
        }
    }

    fn expression(&mut self, source: &str, path: NodePath) {
        match self.validator.parser().parse_str(source) {
            Ok(expr) => {
                for issue in type_mismatches(&expr, self.validator.catalog, &path) {
                    self.report.push(issue);
                }
                self.checked.push(CheckedExpression {
                    path,
                    source: source.to_string(),
                });
            }
            Err(error) => {
                tracing::debug!(path = %path, "Invalid expression '{}': {}", source, error);
                self.report
                    .push(ValidationIssue::from_expression_error(path, &error));
            }
        }
    }
}

/// Statically known type of an expression, when there is one
fn static_type(expr: &Expression, catalog: &FieldCatalog) -> Option<DataType> {
    match expr {
        Expression::FieldRef(name) => catalog.data_type(name),
        Expression::FunctionCall { function, .. } => Some(function.signature().returns),
        Expression::Literal(Value::Number(_)) => Some(DataType::Numeric),
        Expression::Literal(value @ Value::String(_)) => match value.as_number() {
            Some(_) => Some(DataType::Numeric),
            None => Some(DataType::String),
        },
        _ => None,
    }
}

/// Literal that can never be read as a number
fn non_numeric_literal(expr: &Expression) -> Option<&Value> {
    match expr {
        Expression::Literal(value @ (Value::String(_) | Value::Bool(_))) if value.as_number().is_none() => {
            Some(value)
        }
        _ => None,
    }
}

/// Ordering comparisons between a numeric operand and a non-numeric literal
fn type_mismatches(
    expr: &Expression,
    catalog: &FieldCatalog,
    path: &NodePath,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    collect_type_mismatches(expr, catalog, path, &mut issues);
    issues
}

fn collect_type_mismatches(
    expr: &Expression,
    catalog: &FieldCatalog,
    path: &NodePath,
    issues: &mut Vec<ValidationIssue>,
) {
    match expr {
        Expression::Binary { left, op, right } => {
            if op.is_ordering() {
                for (operand, other) in [(left, right), (right, left)] {
                    if static_type(operand, catalog) != Some(DataType::Numeric) {
                        continue;
                    }
                    if let Some(literal) = non_numeric_literal(other) {
                        issues.push(ValidationIssue::new(
                            path.clone(),
                            IssueCode::TypeMismatch,
                            format!(
                                "{} compares a numeric value with non-numeric {} '{}'; strings are compared instead",
                                op,
                                literal.type_name(),
                                literal
                            ),
                        ));
                    }
                }
            }
            collect_type_mismatches(left, catalog, path, issues);
            collect_type_mismatches(right, catalog, path, issues);
        }
        Expression::Unary { operand, .. } => collect_type_mismatches(operand, catalog, path, issues),
        Expression::FunctionCall { args, .. } => {
            for arg in args {
                collect_type_mismatches(arg, catalog, path, issues);
            }
        }
        Expression::Literal(_) | Expression::FieldRef(_) => {}
    }
}

/// Validate a condition tree with default settings
pub fn validate(condition: &Condition, catalog: &FieldCatalog) -> ValidationReport {
    ConditionValidator::new(catalog).validate(condition)
}

/// Fast single-expression check: balanced parentheses, then known field
/// references. Returns the first problem only.
///
/// Field references are not checked against an empty catalog.
pub fn quick_check(source: &str, catalog: &FieldCatalog) -> Option<ValidationIssue> {
    let path = NodePath::root();

    // tokenize checks parentheses before anything else
    let tokens = match tokenize(source) {
        Ok(tokens) => tokens,
        Err(e) => {
            return Some(
                ValidationIssue::new(path, IssueCode::Syntax, e.reason.to_string())
                    .with_position(e.position),
            )
        }
    };

    tokens.iter().find_map(|token| match &token.kind {
        TokenKind::FieldRef(name) if !catalog.is_empty() && !catalog.contains(name) => Some(
            ValidationIssue::new(
                path.clone(),
                IssueCode::UnknownField,
                format!("unknown field '{}'", name),
            )
            .with_position(token.span.start),
        ),
        _ => None,
    })
}
