//! Unit tests for Engine

use super::*;
use crate::builder::EngineBuilder;
use crate::config::EngineConfig;
use crate::error::SdkError;
use crate::hook::{ExpressionHook, HookVerdict};
use crate::validator::IssueCode;
use async_trait::async_trait;
use batchmap_core::condition::{Condition, NodePath};
use batchmap_core::types::{DataType, FieldCatalog, Record, Value};
use batchmap_runtime::{EvalErrorKind, EvalState};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn record(value: serde_json::Value) -> Record {
    serde_json::from_value(value).unwrap()
}

fn catalog() -> FieldCatalog {
    FieldCatalog::new()
        .with_field("age", DataType::Numeric)
        .with_field("status", DataType::String)
        .with_field("amount", DataType::Numeric)
}

fn engine() -> Engine {
    Engine::new(EngineConfig::default(), catalog()).unwrap()
}

#[test]
fn test_engine_creation() {
    assert!(Engine::new(EngineConfig::new(), FieldCatalog::new()).is_ok());

    let err = Engine::new(EngineConfig::new().with_max_depth(0), catalog()).unwrap_err();
    assert!(matches!(err, SdkError::ConfigError(_)));
}

#[test]
fn test_parse_cache() {
    let engine = engine();
    let first = engine.parse("{age} >= 18").unwrap();
    let second = engine.parse("{age} >= 18").unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(engine.cache_len(), 1);

    engine.clear_cache();
    assert_eq!(engine.cache_len(), 0);
}

#[test]
fn test_parse_cache_disabled() {
    let engine = Engine::new(EngineConfig::new().cache_expressions(false), catalog()).unwrap();
    engine.parse("{age} >= 18").unwrap();
    assert_eq!(engine.cache_len(), 0);
}

#[test]
fn test_failed_parse_is_not_cached() {
    let engine = engine();
    assert!(engine.parse("{unknown} == 1").is_err());
    assert_eq!(engine.cache_len(), 0);
}

#[test]
fn test_evaluate_expression_checks_catalog() {
    let engine = engine();
    let rec = record(json!({ "amount": 1500, "status": "active user" }));

    let value = engine
        .evaluate_expression(r#"{amount} > 1000 AND {status} CONTAINS "active""#, &rec)
        .unwrap();
    assert_eq!(value, Value::Bool(true));

    let err = engine.evaluate_expression("{balance} > 0", &rec).unwrap_err();
    assert!(matches!(err, SdkError::ExpressionError(_)));
}

#[test]
fn test_evaluate_condition_default_value() {
    let engine = EngineBuilder::new()
        .with_catalog(catalog())
        .with_default_value("UNKNOWN")
        .build()
        .unwrap();
    let condition = Condition::new("{age} >= 18").with_then("adult");

    let outcome = engine.evaluate_condition(&condition, &record(json!({ "age": 3 }))).unwrap();
    assert_eq!(outcome.value, Value::string("UNKNOWN"));
    assert_eq!(outcome.state, EvalState::Fallback);
    assert_eq!(outcome.warnings.len(), 1);

    let outcome = engine
        .evaluate_condition_with_default(&condition, &record(json!({ "age": 3 })), &Value::Null)
        .unwrap();
    assert_eq!(outcome.value, Value::Null);
}

#[test]
fn test_long_expression_is_an_error_not_a_crash() {
    let engine = engine();
    let source = vec!["{age} == 1"; 20_000].join(" AND ");

    let err = engine.evaluate_expression(&source, &Record::new()).unwrap_err();
    assert!(matches!(err, SdkError::ExpressionError(_)));
    assert!(err.to_string().contains("nests deeper than"));
}

#[test]
fn test_evaluate_condition_uses_configured_depth() {
    let engine = Engine::new(EngineConfig::new().with_max_depth(1), catalog()).unwrap();
    let rec = record(json!({ "age": 5 }));

    // else-if entries are siblings of the root
    let condition = Condition::new("{age} > 100")
        .with_else_if(Condition::new("{age} > 10").with_then("x"))
        .with_else_if(Condition::new("{age} > 1").with_then("y"))
        .with_else("z");
    let outcome = engine.evaluate_condition(&condition, &rec).unwrap();
    assert_eq!(outcome.value, Value::string("y"));

    let condition = Condition::new("{age} > 100")
        .with_then("x")
        .with_else(Condition::new("{age} > 1").with_then("y"));
    let err = engine.evaluate_condition(&condition, &rec).unwrap_err();
    match err {
        SdkError::EvalError(e) => {
            assert!(matches!(e.kind, EvalErrorKind::MaxDepthExceeded { depth: 1, max: 1 }))
        }
        other => panic!("expected an evaluation error, got {:?}", other),
    }
}

#[test]
fn test_validate_uses_catalog_and_depth() {
    let engine = Engine::new(EngineConfig::new().with_max_depth(1), catalog()).unwrap();
    let condition = Condition::new("{balance} > 1")
        .with_then(Condition::new("{age} > 1").with_then("y"))
        .with_else_if(Condition::new("{age} > 1").with_then("y"))
        .with_else("z");

    let report = engine.validate(&condition);
    let codes: Vec<IssueCode> = report.errors.iter().map(|e| e.code).collect();
    assert_eq!(codes, vec![IssueCode::UnknownField, IssueCode::MaxDepthExceeded]);
    assert_eq!(report.errors[1].path.as_str(), "then");
}

#[test]
fn test_quick_check() {
    let engine = engine();
    assert!(engine.quick_check("{age} > 1 AND {status} IS_NOT_EMPTY").is_none());

    let issue = engine.quick_check("{age} > 1 AND {balance} > 2").unwrap();
    assert_eq!(issue.code, IssueCode::UnknownField);
    assert_eq!(issue.position, Some(14));
}

#[test]
fn test_run_test_cases() {
    let engine = engine();
    let condition = Condition::new("{age} >= 18")
        .with_then("adult")
        .with_else("TO_NUMBER({status})");

    let cases = vec![
        TestCase::new("adult", record(json!({ "age": 20 })), "adult"),
        TestCase::new("wrong", record(json!({ "age": 20 })), "minor"),
        TestCase::new("numeric", record(json!({ "age": 2, "status": "7" })), "7"),
        TestCase::new("error", record(json!({ "age": 2, "status": "x" })), "x"),
    ];

    let results = engine.run_test_cases(&condition, &cases);
    let passed: Vec<bool> = results.iter().map(|r| r.passed).collect();
    assert_eq!(passed, vec![true, false, true, false]);

    assert_eq!(results[1].actual, Some(Value::string("adult")));
    assert_eq!(results[2].actual, Some(Value::Number(7.0)));
    assert!(results[3].actual.is_none());
    assert!(results[3].error.as_deref().unwrap().contains("Evaluation error"));
}

// ========== Hook ==========

struct RejectNumbers {
    calls: AtomicUsize,
}

#[async_trait]
impl ExpressionHook for RejectNumbers {
    async fn check(&self, _path: &NodePath, source: &str) -> crate::Result<HookVerdict> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if source.chars().all(|c| c.is_ascii_digit()) {
            Ok(HookVerdict::reject("plain numbers are not allowed"))
        } else {
            Ok(HookVerdict::Accept)
        }
    }
}

struct Unavailable;

#[async_trait]
impl ExpressionHook for Unavailable {
    async fn check(&self, _path: &NodePath, _source: &str) -> crate::Result<HookVerdict> {
        Err(SdkError::ConfigError("rules service unreachable".to_string()))
    }
}

#[tokio::test]
async fn test_validate_with_hook() {
    let hook = Arc::new(RejectNumbers {
        calls: AtomicUsize::new(0),
    });
    let engine = EngineBuilder::new()
        .with_catalog(catalog())
        .with_hook(hook.clone())
        .build()
        .unwrap();

    // `{bogus}` fails locally and never reaches the hook
    let condition = Condition::new("{age} > 1")
        .with_then("42")
        .with_else_if(Condition::new("{bogus} > 1").with_then("b"))
        .with_else("c");

    let report = engine.validate_with_hook(&condition).await.unwrap();
    assert_eq!(hook.calls.load(Ordering::SeqCst), 4);

    let rejected: Vec<&str> = report
        .issues_with(IssueCode::ExternalRejected)
        .map(|i| i.path.as_str())
        .collect();
    assert_eq!(rejected, vec!["then"]);
    assert_eq!(report.issues_with(IssueCode::UnknownField).count(), 1);
    assert!(!report.valid);
}

#[tokio::test]
async fn test_validate_with_hook_without_hook() {
    let engine = engine();
    let condition = Condition::new("{age} > 1").with_then("42").with_else("0");

    let report = engine.validate_with_hook(&condition).await.unwrap();
    assert_eq!(report, engine.validate(&condition));
}

#[tokio::test]
async fn test_hook_failure_aborts_validation() {
    let engine = EngineBuilder::new()
        .with_catalog(catalog())
        .with_hook(Arc::new(Unavailable))
        .build()
        .unwrap();
    let condition = Condition::new("{age} > 1").with_then("x").with_else("y");

    let err = engine.validate_with_hook(&condition).await.unwrap_err();
    assert!(matches!(err, SdkError::ValidationHook(ref m) if m.contains("unreachable")));
}
