//! Core Engine implementation

use super::types::{TestCase, TestCaseResult};
use crate::config::EngineConfig;
use crate::error::{Result, SdkError};
use crate::hook::{ExpressionHook, HookVerdict};
use crate::mapping::FieldMapping;
use crate::validator::{ConditionValidator, IssueCode, ValidationIssue, ValidationReport};
use batchmap_core::ast::Expression;
use batchmap_core::condition::Condition;
use batchmap_core::types::{FieldCatalog, Record, Value};
use batchmap_parser::{ExpressionError, ExpressionParser};
use batchmap_runtime::{ConditionEvaluator, ConditionOutcome, ExpressionProvider};
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;

pub struct Engine {
    /// Configuration
    config: EngineConfig,

    /// Known source fields, checked at parse time
    catalog: FieldCatalog,

    /// Parsed expressions keyed by source text
    cache: DashMap<String, Arc<Expression>>,

    /// Optional external validation hook
    hook: Option<Arc<dyn ExpressionHook>>,
}

impl Engine {
    /// Create a new engine from configuration and a field catalog
    pub fn new(config: EngineConfig, catalog: FieldCatalog) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, catalog, None))
    }

    pub(crate) fn from_parts(
        config: EngineConfig,
        catalog: FieldCatalog,
        hook: Option<Arc<dyn ExpressionHook>>,
    ) -> Self {
        tracing::debug!(
            "Creating engine: {} catalog field(s), max_depth={}, grouping={:?}",
            catalog.len(),
            config.max_depth,
            config.grouping
        );

        Self {
            config,
            catalog,
            cache: DashMap::new(),
            hook,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    // ========== Expressions ==========

    /// Parse an expression against the catalog, through the cache when enabled
    pub fn parse(&self, source: &str) -> Result<Arc<Expression>> {
        Ok(self.expression(source)?)
    }

    /// Parse and evaluate a single expression against a record
    pub fn evaluate_expression(&self, source: &str, record: &Record) -> Result<Value> {
        let expr = self.parse(source)?;
        Ok(batchmap_runtime::evaluate(&expr, record)?)
    }

    /// Number of cached expression trees
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Parser for this engine; an empty catalog accepts any field
    fn parser(&self) -> ExpressionParser<'_> {
        let parser = ExpressionParser::new().with_mode(self.config.grouping);
        if self.catalog.is_empty() {
            parser
        } else {
            parser.with_catalog(&self.catalog)
        }
    }

    // ========== Conditions ==========

    /// Evaluate a condition tree, falling back to the configured default value
    pub fn evaluate_condition(
        &self,
        condition: &Condition,
        record: &Record,
    ) -> Result<ConditionOutcome> {
        self.evaluate_condition_with_default(condition, record, &self.config.default_value)
    }

    /// Evaluate a condition tree with an explicit fallback value
    pub fn evaluate_condition_with_default(
        &self,
        condition: &Condition,
        record: &Record,
        default: &Value,
    ) -> Result<ConditionOutcome> {
        let evaluator =
            ConditionEvaluator::with_provider(self).with_max_depth(self.config.max_depth);
        Ok(evaluator.evaluate(condition, record, default)?)
    }

    /// Run the builder's test cases against a condition.
    ///
    /// Every case is run; an evaluation error fails only its own case.
    pub fn run_test_cases(&self, condition: &Condition, cases: &[TestCase]) -> Vec<TestCaseResult> {
        cases
            .iter()
            .map(|case| match self.evaluate_condition(condition, &case.inputs) {
                Ok(outcome) => {
                    let result = TestCaseResult::evaluated(case, outcome.value);
                    tracing::debug!(
                        "Test case '{}': {} (branch {})",
                        case.name,
                        if result.passed { "passed" } else { "failed" },
                        outcome.branch
                    );
                    result
                }
                Err(e) => {
                    tracing::debug!("Test case '{}' errored: {}", case.name, e);
                    TestCaseResult::failed(case, e)
                }
            })
            .collect()
    }

    // ========== Validation ==========

    fn validator(&self) -> ConditionValidator<'_> {
        ConditionValidator::new(&self.catalog)
            .with_max_depth(self.config.max_depth)
            .with_mode(self.config.grouping)
    }

    /// Check every expression of a condition tree, collecting all issues
    pub fn validate(&self, condition: &Condition) -> ValidationReport {
        self.validator().validate(condition)
    }

    /// Fast single-expression check returning the first problem only
    pub fn quick_check(&self, source: &str) -> Option<ValidationIssue> {
        crate::validator::quick_check(source, &self.catalog)
    }

    /// Validate, then pass every expression that passed to the external hook.
    ///
    /// Without a hook this is the same as [`Engine::validate`].
    pub async fn validate_with_hook(&self, condition: &Condition) -> Result<ValidationReport> {
        let (mut report, checked) = self.validator().validate_collect(condition);

        let Some(hook) = &self.hook else {
            return Ok(report);
        };

        for expression in checked {
            let verdict = hook
                .check(&expression.path, &expression.source)
                .await
                .map_err(|e| match e {
                    SdkError::ValidationHook(_) => e,
                    other => SdkError::ValidationHook(other.to_string()),
                })?;

            if let HookVerdict::Reject(message) = verdict {
                tracing::debug!(path = %expression.path, "Expression rejected by hook: {}", message);
                report.push(ValidationIssue::new(
                    expression.path,
                    IssueCode::ExternalRejected,
                    message,
                ));
            }
        }

        Ok(report)
    }

    // ========== Field mappings ==========

    /// Render one fixed-width output cell
    pub fn render_field(&self, mapping: &FieldMapping, record: &Record) -> Result<String> {
        mapping.render(self, record)
    }

    /// Render a whole output record, cells ordered by target position
    pub fn render_record(&self, mappings: &[FieldMapping], record: &Record) -> Result<String> {
        let mut ordered: Vec<&FieldMapping> = mappings.iter().collect();
        ordered.sort_by_key(|m| m.target_position.unwrap_or(usize::MAX));

        let mut line = String::new();
        for mapping in ordered {
            line.push_str(&mapping.render(self, record)?);
        }
        Ok(line)
    }
}

impl ExpressionProvider for Engine {
    fn expression(&self, source: &str) -> std::result::Result<Arc<Expression>, ExpressionError> {
        if !self.config.cache_expressions {
            return self.parser().parse_str(source).map(Arc::new);
        }

        if let Some(cached) = self.cache.get(source) {
            return Ok(Arc::clone(cached.value()));
        }

        let expr = Arc::new(self.parser().parse_str(source)?);
        self.cache.insert(source.to_string(), Arc::clone(&expr));
        Ok(expr)
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("catalog", &self.catalog)
            .field("cached", &self.cache.len())
            .field("hook", &self.hook.is_some())
            .finish()
    }
}
