//! Condition tree evaluator
//!
//! Selects a branch of an IF / ELSE-IF* / ELSE tree for one record:
//!
//! 1. `ifExpr` truthy: resolve `then` (missing `then` is Null).
//! 2. Otherwise try each `elseIfExprs` entry in order. An entry matches when
//!    its own `ifExpr` holds or one of its own else-ifs matches. The first
//!    match wins and later entries are never evaluated.
//! 3. Otherwise resolve the root `elseExpr`, or fall back to the caller's
//!    default with a [`EvalWarning::MissingElse`].
//!
//! The root is at depth 0. Else-if entries are siblings and share their
//! parent's depth; a nested `then`/`elseExpr` condition sits one level below
//! its parent. Entering a condition at `depth >= max_depth` fails with
//! `MaxDepthExceeded`.

use super::evaluator::evaluate;
use crate::error::{EvalError, EvalErrorKind, Result};
use batchmap_core::ast::Expression;
use batchmap_core::condition::{Condition, NodePath, ValueSource, DEFAULT_MAX_DEPTH};
use batchmap_core::{Record, Value};
use batchmap_parser::{ExpressionError, ExpressionParser, GroupingMode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Supplies parsed expressions for source strings met in a condition tree
pub trait ExpressionProvider {
    fn expression(&self, source: &str) -> std::result::Result<Arc<Expression>, ExpressionError>;
}

impl<P: ExpressionProvider + ?Sized> ExpressionProvider for &P {
    fn expression(&self, source: &str) -> std::result::Result<Arc<Expression>, ExpressionError> {
        (**self).expression(source)
    }
}

/// Parses every source on demand, without a catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOnDemand {
    pub mode: GroupingMode,
}

impl ExpressionProvider for ParseOnDemand {
    fn expression(&self, source: &str) -> std::result::Result<Arc<Expression>, ExpressionError> {
        ExpressionParser::new()
            .with_mode(self.mode)
            .parse_str(source)
            .map(Arc::new)
    }
}

/// Evaluation state of a condition tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvalState {
    Root,
    EvaluatingIf,
    EvaluatingElseIf(usize),
    /// An `ifExpr` held and its `then` was used
    Matched,
    /// No branch held; the root `elseExpr` was used
    Defaulted,
    /// No branch held and there is no `elseExpr`; the caller default was used
    Fallback,
    DepthExceeded,
}

/// Non-fatal conditions met during evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EvalWarning {
    /// No branch held and the condition has no `elseExpr`
    MissingElse { path: NodePath },
}

/// Result of evaluating a condition tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionOutcome {
    pub value: Value,
    /// Final state of the root condition
    pub state: EvalState,
    /// Path of the value source that produced `value`
    pub branch: NodePath,
    pub warnings: Vec<EvalWarning>,
}

/// A matched branch: its `then` source and where it sits
struct Selected<'c> {
    then: Option<&'c ValueSource>,
    path: NodePath,
    depth: usize,
}

/// Condition tree evaluator
#[derive(Debug, Clone)]
pub struct ConditionEvaluator<P = ParseOnDemand> {
    provider: P,
    max_depth: usize,
}

impl ConditionEvaluator<ParseOnDemand> {
    /// Create an evaluator that parses sources on demand with logical grouping
    pub fn new() -> Self {
        Self::with_provider(ParseOnDemand::default())
    }
}

impl Default for ConditionEvaluator<ParseOnDemand> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ExpressionProvider> ConditionEvaluator<P> {
    pub fn with_provider(provider: P) -> Self {
        Self {
            provider,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Evaluate a condition tree; `default` is used when nothing holds and
    /// there is no `elseExpr`
    pub fn evaluate(
        &self,
        condition: &Condition,
        record: &Record,
        default: &Value,
    ) -> Result<ConditionOutcome> {
        let mut warnings = Vec::new();
        tracing::trace!(state = ?EvalState::Root, "Evaluating condition tree");

        match self.evaluate_node(condition, record, 0, NodePath::root(), default, &mut warnings) {
            Ok((value, state, branch)) => {
                tracing::debug!(state = ?state, branch = %branch, "Condition resolved to {}", value);
                Ok(ConditionOutcome {
                    value,
                    state,
                    branch,
                    warnings,
                })
            }
            Err(e) => {
                if matches!(e.kind, EvalErrorKind::MaxDepthExceeded { .. }) {
                    tracing::debug!(state = ?EvalState::DepthExceeded, "{}", e);
                }
                Err(e)
            }
        }
    }

    /// Full IF / ELSE-IF* / ELSE evaluation of one node
    fn evaluate_node(
        &self,
        condition: &Condition,
        record: &Record,
        depth: usize,
        path: NodePath,
        default: &Value,
        warnings: &mut Vec<EvalWarning>,
    ) -> Result<(Value, EvalState, NodePath)> {
        if let Some(selected) = self.select(condition, record, depth, &path)? {
            let (value, branch) = self.resolve(
                selected.then,
                record,
                selected.depth + 1,
                selected.path,
                default,
                warnings,
            )?;
            return Ok((value, EvalState::Matched, branch));
        }

        if let Some(else_expr) = &condition.else_expr {
            let (value, branch) = self.resolve(
                Some(else_expr),
                record,
                depth + 1,
                path.else_expr(),
                default,
                warnings,
            )?;
            return Ok((value, EvalState::Defaulted, branch));
        }

        tracing::warn!(
            path = %path,
            "No branch matched and no else expression; using default {}",
            default
        );
        warnings.push(EvalWarning::MissingElse { path: path.clone() });
        Ok((default.clone(), EvalState::Fallback, path))
    }

    /// Find the first matching branch at or below `condition`
    fn select<'c>(
        &self,
        condition: &'c Condition,
        record: &Record,
        depth: usize,
        path: &NodePath,
    ) -> Result<Option<Selected<'c>>> {
        if depth >= self.max_depth {
            return Err(EvalError::max_depth(depth, self.max_depth));
        }

        tracing::trace!(state = ?EvalState::EvaluatingIf, path = %path, depth, "Evaluating ifExpr");
        let if_path = path.if_expr();
        let expr = self.expression(&condition.if_expr, &if_path)?;
        if evaluate(&expr, record)?.is_truthy() {
            return Ok(Some(Selected {
                then: condition.then.as_ref(),
                path: path.then(),
                depth,
            }));
        }

        for (i, branch) in condition.else_ifs().iter().enumerate() {
            tracing::trace!(state = ?EvalState::EvaluatingElseIf(i), path = %path, "Trying else-if");
            if let Some(selected) = self.select(branch, record, depth, &path.else_if(i))? {
                return Ok(Some(selected));
            }
        }

        Ok(None)
    }

    /// Produce the value of a branch source
    fn resolve(
        &self,
        source: Option<&ValueSource>,
        record: &Record,
        depth: usize,
        path: NodePath,
        default: &Value,
        warnings: &mut Vec<EvalWarning>,
    ) -> Result<(Value, NodePath)> {
        match source {
            None => Ok((Value::Null, path)),
            Some(ValueSource::Expression(source)) if source.trim().is_empty() => {
                Ok((Value::Null, path))
            }
            Some(ValueSource::Expression(source)) => {
                let expr = self.expression(source, &path)?;
                Ok((branch_value(&expr, source, record)?, path))
            }
            Some(ValueSource::Nested(nested)) => {
                let (value, _, branch) =
                    self.evaluate_node(nested, record, depth, path, default, warnings)?;
                Ok((value, branch))
            }
        }
    }

    fn expression(&self, source: &str, path: &NodePath) -> Result<Arc<Expression>> {
        self.provider
            .expression(source)
            .map_err(|e| EvalError::invalid_expression(path.clone(), e))
    }
}

/// Value of a branch source. A branch that is a single bare number keeps
/// its text, so `0010` or `1.50` reach the output as written.
fn branch_value(expr: &Expression, source: &str, record: &Record) -> Result<Value> {
    if let Expression::Literal(Value::Number(_)) = expr {
        let text = source.trim();
        if text.parse::<f64>().is_ok() {
            return Ok(Value::string(text));
        }
    }
    evaluate(expr, record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, Value)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn age(n: f64) -> Record {
        record(&[("age", Value::Number(n))])
    }

    #[test]
    fn test_if_then_else() {
        let condition = Condition::new("{age} >= 18")
            .with_then("adult")
            .with_else("minor");
        let evaluator = ConditionEvaluator::new();

        let outcome = evaluator.evaluate(&condition, &age(20.0), &Value::Null).unwrap();
        assert_eq!(outcome.value, Value::string("adult"));
        assert_eq!(outcome.state, EvalState::Matched);
        assert_eq!(outcome.branch.as_str(), "then");

        let outcome = evaluator.evaluate(&condition, &age(10.0), &Value::Null).unwrap();
        assert_eq!(outcome.value, Value::string("minor"));
        assert_eq!(outcome.state, EvalState::Defaulted);
        assert_eq!(outcome.branch.as_str(), "elseExpr");

        let outcome = evaluator
            .evaluate(&condition, &Record::new(), &Value::Null)
            .unwrap();
        assert_eq!(outcome.value, Value::string("minor"));
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_first_matching_else_if_wins() {
        let condition = Condition::new("{age} >= 65")
            .with_then("senior")
            .with_else_if(Condition::new("{age} >= 18").with_then("adult"))
            .with_else_if(Condition::new("{age} >= 13").with_then("teen"))
            // would fail to evaluate if reached
            .with_else_if(Condition::new("TO_NUMBER(x) > 1").with_then("never"))
            .with_else("child");
        let evaluator = ConditionEvaluator::new();

        let outcome = evaluator.evaluate(&condition, &age(15.0), &Value::Null).unwrap();
        assert_eq!(outcome.value, Value::string("teen"));
        assert_eq!(outcome.branch.as_str(), "elseIfExprs[1].then");
        assert_eq!(outcome.state, EvalState::Matched);
    }

    #[test]
    fn test_fallback_uses_default_with_warning() {
        let condition = Condition::new("{age} >= 18").with_then("adult");
        let outcome = ConditionEvaluator::new()
            .evaluate(&condition, &age(3.0), &Value::string("N/A"))
            .unwrap();

        assert_eq!(outcome.value, Value::string("N/A"));
        assert_eq!(outcome.state, EvalState::Fallback);
        assert_eq!(
            outcome.warnings,
            vec![EvalWarning::MissingElse {
                path: NodePath::root()
            }]
        );
    }

    #[test]
    fn test_missing_then_is_null() {
        let condition = Condition::new("{age} >= 18").with_else("minor");
        let outcome = ConditionEvaluator::new()
            .evaluate(&condition, &age(30.0), &Value::string("d"))
            .unwrap();
        assert_eq!(outcome.value, Value::Null);
        assert_eq!(outcome.state, EvalState::Matched);
    }

    #[test]
    fn test_else_if_entry_else_is_not_a_fallback() {
        let condition = Condition::new("{age} >= 18")
            .with_then("adult")
            .with_else_if(Condition::new("{age} >= 13").with_then("teen").with_else("ignored"))
            .with_else("child");

        let outcome = ConditionEvaluator::new()
            .evaluate(&condition, &age(5.0), &Value::Null)
            .unwrap();
        assert_eq!(outcome.value, Value::string("child"));
    }

    #[test]
    fn test_nested_then_condition() {
        let condition = Condition::new("{type} == A")
            .with_then(
                Condition::new("{amount} > 0")
                    .with_then("credit")
                    .with_else("debit"),
            )
            .with_else("other");

        let rec = record(&[("type", Value::string("A")), ("amount", Value::Number(-5.0))]);
        let outcome = ConditionEvaluator::new()
            .evaluate(&condition, &rec, &Value::Null)
            .unwrap();
        assert_eq!(outcome.value, Value::string("debit"));
        assert_eq!(outcome.branch.as_str(), "then.elseExpr");
        assert_eq!(outcome.state, EvalState::Matched);
    }

    /// `levels` conditions, each nested as the `then` of its parent; only
    /// the innermost has a value
    fn then_chain(levels: usize) -> Condition {
        let mut condition = Condition::new("{x} == deepest").with_then("found");
        for _ in 1..levels {
            condition = Condition::new("{x} IS_NOT_EMPTY").with_then(condition);
        }
        condition
    }

    #[test]
    fn test_depth_bound() {
        let rec = record(&[("x", Value::string("deepest"))]);
        let evaluator = ConditionEvaluator::new().with_max_depth(5);

        let outcome = evaluator
            .evaluate(&then_chain(5), &rec, &Value::Null)
            .unwrap();
        assert_eq!(outcome.value, Value::string("found"));
        assert_eq!(outcome.branch.as_str(), "then.then.then.then.then");

        let err = evaluator
            .evaluate(&then_chain(6), &rec, &Value::Null)
            .unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::MaxDepthExceeded { depth: 5, max: 5 });
    }

    #[test]
    fn test_else_nesting_counts_toward_depth() {
        let rec = record(&[("x", Value::string("a"))]);
        let condition = Condition::new("{x} == b")
            .with_then("b")
            .with_else(Condition::new("{x} == a").with_then("a").with_else("other"));

        let outcome = ConditionEvaluator::new()
            .with_max_depth(2)
            .evaluate(&condition, &rec, &Value::Null)
            .unwrap();
        assert_eq!(outcome.value, Value::string("a"));

        let err = ConditionEvaluator::new()
            .with_max_depth(1)
            .evaluate(&condition, &rec, &Value::Null)
            .unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::MaxDepthExceeded { depth: 1, max: 1 });
    }

    #[test]
    fn test_else_ifs_do_not_count_toward_depth() {
        let mut condition = Condition::new("{n} == 0").with_then("0");
        for i in 1..50 {
            condition = condition.with_else_if(
                Condition::new(format!("{{n}} == {}", i)).with_then(format!("v{}", i)),
            );
        }
        // an else-if nested inside an else-if is still a sibling chain
        condition = condition.with_else_if(
            Condition::new("{n} == 100").with_else_if(Condition::new("{n} == 101").with_then("deep")),
        );

        let evaluator = ConditionEvaluator::new().with_max_depth(1);
        let outcome = evaluator
            .evaluate(&condition, &record(&[("n", Value::Number(42.0))]), &Value::Null)
            .unwrap();
        assert_eq!(outcome.value, Value::string("v42"));
        assert_eq!(outcome.branch.as_str(), "elseIfExprs[41].then");

        let outcome = evaluator
            .evaluate(&condition, &record(&[("n", Value::Number(101.0))]), &Value::Null)
            .unwrap();
        assert_eq!(outcome.value, Value::string("deep"));
        assert_eq!(outcome.branch.as_str(), "elseIfExprs[49].elseIfExprs[0].then");
    }

    #[test]
    fn test_numeric_branch_keeps_source_text() {
        let condition = Condition::new("{age} >= 18")
            .with_then(" 0010 ")
            .with_else("1.50");
        let evaluator = ConditionEvaluator::new();

        let outcome = evaluator.evaluate(&condition, &age(20.0), &Value::Null).unwrap();
        assert_eq!(outcome.value, Value::string("0010"));

        let outcome = evaluator.evaluate(&condition, &age(2.0), &Value::Null).unwrap();
        assert_eq!(outcome.value, Value::string("1.50"));
        assert_eq!(outcome.value.as_number(), Some(1.5));

        // computed values are not affected
        let condition = Condition::new("{age} >= 18").with_then("LENGTH(\"0010\")");
        let outcome = evaluator.evaluate(&condition, &age(20.0), &Value::Null).unwrap();
        assert_eq!(outcome.value, Value::Number(4.0));
    }

    #[test]
    fn test_invalid_branch_expression() {
        let condition = Condition::new("{age} >= 18").with_then("UPPER(");
        let err = ConditionEvaluator::new()
            .evaluate(&condition, &age(20.0), &Value::Null)
            .unwrap_err();

        match err.kind {
            EvalErrorKind::InvalidExpression { path, .. } => assert_eq!(path.as_str(), "then"),
            other => panic!("Expected invalid expression, got {:?}", other),
        }
    }

    #[test]
    fn test_outcome_serializes_for_ui() {
        let condition = Condition::new("{age} >= 18").with_then("adult");
        let outcome = ConditionEvaluator::new()
            .evaluate(&condition, &age(20.0), &Value::Null)
            .unwrap();

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["value"], "adult");
        assert_eq!(json["branch"], "then");
        assert_eq!(json["state"], "Matched");
    }
}
