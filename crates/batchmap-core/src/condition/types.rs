//! Condition payload types

use serde::{Deserialize, Serialize};

/// Default bound on condition nesting, matching the configuration UI
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// One IF / ELSE-IF* / ELSE node
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Condition expression source
    pub if_expr: String,

    /// Value produced when `if_expr` holds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub then: Option<ValueSource>,

    /// Fallback value when no branch holds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub else_expr: Option<ValueSource>,

    /// ELSE-IF branches, tried in declaration order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub else_if_exprs: Option<Vec<Condition>>,
}

/// Source of a branch value: an expression, or a nested condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueSource {
    Expression(String),
    Nested(Box<Condition>),
}

impl Condition {
    /// Create a condition with only an IF expression
    pub fn new(if_expr: impl Into<String>) -> Self {
        Self {
            if_expr: if_expr.into(),
            ..Self::default()
        }
    }

    /// Set the THEN value
    pub fn with_then(mut self, then: impl Into<ValueSource>) -> Self {
        self.then = Some(then.into());
        self
    }

    /// Set the ELSE value
    pub fn with_else(mut self, else_expr: impl Into<ValueSource>) -> Self {
        self.else_expr = Some(else_expr.into());
        self
    }

    /// Append an ELSE-IF branch
    pub fn with_else_if(mut self, branch: Condition) -> Self {
        self.else_if_exprs.get_or_insert_with(Vec::new).push(branch);
        self
    }

    /// ELSE-IF branches (empty when the key is absent)
    pub fn else_ifs(&self) -> &[Condition] {
        self.else_if_exprs.as_deref().unwrap_or(&[])
    }

    /// Number of condition levels in this tree (a lone condition is 1).
    ///
    /// Else-if entries share their parent's level; only a nested
    /// `then`/`elseExpr` condition adds one.
    pub fn depth(&self) -> usize {
        let nested = [&self.then, &self.else_expr]
            .into_iter()
            .filter_map(|source| source.as_ref().and_then(ValueSource::as_condition))
            .map(|condition| condition.depth() + 1);
        let else_ifs = self.else_ifs().iter().map(Condition::depth);

        nested.chain(else_ifs).max().unwrap_or(1)
    }
}

impl ValueSource {
    pub fn expression(source: impl Into<String>) -> Self {
        ValueSource::Expression(source.into())
    }

    pub fn nested(condition: Condition) -> Self {
        ValueSource::Nested(Box::new(condition))
    }

    pub fn as_expression(&self) -> Option<&str> {
        match self {
            ValueSource::Expression(source) => Some(source),
            ValueSource::Nested(_) => None,
        }
    }

    pub fn as_condition(&self) -> Option<&Condition> {
        match self {
            ValueSource::Expression(_) => None,
            ValueSource::Nested(condition) => Some(condition),
        }
    }
}

impl From<&str> for ValueSource {
    fn from(source: &str) -> Self {
        ValueSource::Expression(source.to_string())
    }
}

impl From<String> for ValueSource {
    fn from(source: String) -> Self {
        ValueSource::Expression(source)
    }
}

impl From<Condition> for ValueSource {
    fn from(condition: Condition) -> Self {
        ValueSource::nested(condition)
    }
}
