//! Unit tests for AST and payload types
//!
//! Tests the core data structures shared by the parser, runtime and SDK

use batchmap_core::ast::*;
use batchmap_core::condition::{Condition, ValueSource, DEFAULT_MAX_DEPTH};
use batchmap_core::types::{DataType, FieldCatalog, Value};
use serde_json::json;

// =============================================================================
// Expression Tests
// =============================================================================

#[test]
fn test_expression_literal_number() {
    let expr = Expression::literal(42.0);
    match expr {
        Expression::Literal(Value::Number(n)) => assert_eq!(n, 42.0),
        _ => panic!("Expected literal number"),
    }
}

#[test]
fn test_expression_literal_string() {
    let expr = Expression::literal("hello");
    match expr {
        Expression::Literal(Value::String(s)) => assert_eq!(s, "hello"),
        _ => panic!("Expected literal string"),
    }
}

#[test]
fn test_expression_field_ref() {
    let expr = Expression::field("amount");
    assert_eq!(expr, Expression::FieldRef("amount".to_string()));
    assert_eq!(expr.field_refs(), vec!["amount"]);
}

#[test]
fn test_expression_logical_chain() {
    // {amount} > 1000 AND {status} CONTAINS "active"
    let expr = Expression::binary(
        Expression::binary(
            Expression::field("amount"),
            Operator::Gt,
            Expression::literal(1000.0),
        ),
        Operator::And,
        Expression::binary(
            Expression::field("status"),
            Operator::Contains,
            Expression::literal("active"),
        ),
    );

    match &expr {
        Expression::Binary { op, .. } => assert!(op.is_logical()),
        _ => panic!("Expected Binary expression"),
    }
    assert_eq!(expr.field_refs(), vec!["amount", "status"]);
}

#[test]
fn test_expression_function_call() {
    let expr = Expression::call(
        Function::Substring,
        vec![
            Expression::field("code"),
            Expression::literal(0.0),
            Expression::literal(3.0),
        ],
    );

    match expr {
        Expression::FunctionCall { function, args } => {
            assert_eq!(function, Function::Substring);
            assert_eq!(args.len(), 3);
            assert!(function.signature().arity.accepts(args.len()));
        }
        _ => panic!("Expected function call"),
    }
}

#[test]
fn test_expression_serde_round_trip() {
    let expr = Expression::unary(
        Operator::IsNotEmpty,
        Expression::call(Function::Trim, vec![Expression::field("note")]),
    );

    let json = serde_json::to_string(&expr).unwrap();
    let back: Expression = serde_json::from_str(&json).unwrap();
    assert_eq!(back, expr);
}

// =============================================================================
// Operator / Function Tests
// =============================================================================

#[test]
fn test_operator_categories_are_disjoint() {
    for op in Operator::ALL {
        let categories = [
            op.is_comparison(),
            op.is_string_match(),
            op.is_unary(),
            op.is_logical(),
        ];
        assert_eq!(
            categories.iter().filter(|c| **c).count(),
            1,
            "{} should be in exactly one category",
            op
        );
    }
}

#[test]
fn test_function_display() {
    assert_eq!(Function::ToNumber.to_string(), "TO_NUMBER");
    assert_eq!("TO_DATE".parse::<Function>().unwrap(), Function::ToDate);
}

// =============================================================================
// Catalog Tests
// =============================================================================

#[test]
fn test_catalog_from_ui_payload() -> anyhow::Result<()> {
    let catalog: FieldCatalog = serde_json::from_value(json!([
        { "name": "age", "dataType": "numeric" },
        { "name": "name", "dataType": "string" },
        { "name": "dob", "dataType": "date" }
    ]))?;

    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.data_type("age"), Some(DataType::Numeric));
    assert_eq!(catalog.data_type("dob"), Some(DataType::Date));
    assert!(!catalog.contains("missing"));

    let names: Vec<&str> = catalog.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["age", "name", "dob"]);
    Ok(())
}

// =============================================================================
// Condition Tests
// =============================================================================

#[test]
fn test_condition_payload_round_trip() -> anyhow::Result<()> {
    let payload = json!({
        "ifExpr": "{amount} > 1000 AND {status} CONTAINS \"active\"",
        "then": "HIGH",
        "elseIfExprs": [
            { "ifExpr": "{amount} > 100", "then": "MID" },
            {
                "ifExpr": "{amount} > 0",
                "then": { "ifExpr": "{vip} == true", "then": "LOW_VIP", "elseExpr": "LOW" }
            }
        ],
        "elseExpr": "NONE"
    });

    let condition: Condition = serde_json::from_value(payload.clone())?;
    assert_eq!(condition.else_ifs().len(), 2);
    assert!(matches!(
        condition.else_ifs()[1].then,
        Some(ValueSource::Nested(_))
    ));
    // the nested THEN of an else-if is the only extra level
    assert_eq!(condition.depth(), 2);

    assert_eq!(serde_json::to_value(&condition)?, payload);
    Ok(())
}

#[test]
fn test_default_max_depth() {
    assert_eq!(DEFAULT_MAX_DEPTH, 5);
}
