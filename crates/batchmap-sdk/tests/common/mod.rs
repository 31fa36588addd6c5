//! Common test utilities for SDK integration tests

#![allow(dead_code)]

use batchmap_sdk::{
    Condition, DataType, Engine, EngineBuilder, IssueCode, Record, ValidationReport, Value,
};
use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a test subscriber once; set RUST_LOG=debug to see engine events
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Engine over the source fields of a typical customer batch
pub fn customer_engine() -> Engine {
    customer_builder().build().expect("engine builds")
}

pub fn customer_builder() -> EngineBuilder {
    init_tracing();
    EngineBuilder::new()
        .add_field("age", DataType::Numeric)
        .add_field("amount", DataType::Numeric)
        .add_field("status", DataType::String)
        .add_field("country", DataType::String)
        .add_field("zip", DataType::String)
        .add_field("name", DataType::String)
        .add_field("opened", DataType::Date)
}

/// Record from a JSON object literal
pub fn record(value: serde_json::Value) -> Record {
    serde_json::from_value(value).expect("record is a JSON object")
}

/// Condition payload from a JSON literal
pub fn condition(value: serde_json::Value) -> Condition {
    serde_json::from_value(value).expect("valid condition payload")
}

/// Evaluate a condition and return its value, panicking on errors
pub fn eval(engine: &Engine, condition: &Condition, value: serde_json::Value) -> Value {
    engine
        .evaluate_condition(condition, &record(value))
        .expect("condition evaluates")
        .value
}

/// Assertion helpers for validation reports
pub trait ReportAssertions {
    fn assert_valid(&self);
    fn assert_error_at(&self, path: &str, code: IssueCode);
    fn assert_warning_at(&self, path: &str, code: IssueCode);
}

impl ReportAssertions for ValidationReport {
    fn assert_valid(&self) {
        assert!(self.valid, "expected a valid report, got errors: {:#?}", self.errors);
    }

    fn assert_error_at(&self, path: &str, code: IssueCode) {
        assert!(
            self.errors.iter().any(|e| e.path.as_str() == path && e.code == code),
            "expected {:?} error at '{}', got: {:#?}",
            code,
            path,
            self.errors
        );
    }

    fn assert_warning_at(&self, path: &str, code: IssueCode) {
        assert!(
            self.warnings.iter().any(|w| w.path.as_str() == path && w.code == code),
            "expected {:?} warning at '{}', got: {:#?}",
            code,
            path,
            self.warnings
        );
    }
}
