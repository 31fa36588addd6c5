//! Test case types for the condition builder's test panel

use batchmap_core::{Record, Value};
use serde::{Deserialize, Serialize};

/// A sample record with the value a condition is expected to produce
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub name: String,

    #[serde(default)]
    pub inputs: Record,

    #[serde(default)]
    pub expected_output: Value,
}

impl TestCase {
    pub fn new(name: impl Into<String>, inputs: Record, expected_output: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            inputs,
            expected_output: expected_output.into(),
        }
    }

    /// Whether an evaluated value satisfies this case.
    ///
    /// Values are equal, or neither is null and their string forms match,
    /// so an expected `"20"` accepts a computed `20`.
    pub fn accepts(&self, actual: &Value) -> bool {
        if &self.expected_output == actual {
            return true;
        }
        !self.expected_output.is_null()
            && !actual.is_null()
            && self.expected_output.to_display_string() == actual.to_display_string()
    }
}

/// Result of running one test case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCaseResult {
    pub name: String,

    /// Evaluated value, when evaluation succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<Value>,

    /// Evaluation error message, when it failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub passed: bool,
}

impl TestCaseResult {
    pub(crate) fn evaluated(case: &TestCase, actual: Value) -> Self {
        Self {
            name: case.name.clone(),
            passed: case.accepts(&actual),
            actual: Some(actual),
            error: None,
        }
    }

    pub(crate) fn failed(case: &TestCase, error: impl ToString) -> Self {
        Self {
            name: case.name.clone(),
            actual: None,
            error: Some(error.to_string()),
            passed: false,
        }
    }
}
