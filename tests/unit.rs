//! Unit tests for values, kinds, tags and the method catalogue.
mod common;
use cadeia::prelude::*;
use common::*;

#[test]
fn test_value_display() {
    assert_eq!(format!("{}", Value::Number(42.0)), "42");
    assert_eq!(format!("{}", Value::Number(2.5)), "2.5");
    assert_eq!(format!("{}", Value::Bool(true)), "true");
    assert_eq!(format!("{}", Value::Null), "null");
    assert_eq!(format!("{}", Value::Undefined), "undefined");
    assert_eq!(
        format!("{}", val(serde_json::json!([1, "a"]))),
        "[1, \"a\"]"
    );
}

#[test]
fn test_value_kinds() {
    assert_eq!(
        val(serde_json::json!([1])).method_kind(),
        Some(ValueKind::Array)
    );
    assert_eq!(
        val(serde_json::json!({"a": 1})).method_kind(),
        Some(ValueKind::Object)
    );
    assert_eq!(Value::String("x".into()).method_kind(), Some(ValueKind::String));
    assert_eq!(Value::Number(1.0).method_kind(), Some(ValueKind::Number));
    assert_eq!(Value::Null.method_kind(), None);
    assert_eq!(Value::Undefined.method_kind(), None);
}

#[test]
fn test_value_coercions() {
    assert_eq!(Value::coerce_literal("25"), Value::Number(25.0));
    assert_eq!(Value::coerce_literal("true"), Value::Bool(true));
    assert_eq!(Value::coerce_literal("ana"), Value::String("ana".into()));
    assert_eq!(Value::String("5".into()).coerce_number(), 5.0);
    assert_eq!(Value::Bool(true).coerce_number(), 1.0);
    assert_eq!(Value::Null.coerce_number(), 0.0);
}

#[test]
fn test_op_kind_tags() {
    assert_eq!(OpKind::GetProperty.as_str(), "getProperty");
    assert_eq!(OpKind::ReduceSum.as_str(), "reduceSum");
    assert_eq!(OpKind::parse("callMethod"), Some(OpKind::CallMethod));
    assert_eq!(OpKind::parse("unknown"), None);

    // The tags are serde names too; they are public contract.
    for kind in OpKind::ALL {
        let tag = serde_json::to_string(&kind).unwrap();
        assert_eq!(tag, format!("\"{}\"", kind.as_str()));
    }
}

#[test]
fn test_operation_registry_lookup() {
    let (_, operations) = default_registries();
    for kind in OpKind::ALL {
        assert!(operations.by_kind(kind).is_some());
    }
    assert!(operations.by_tag("filter").is_some());
    assert!(operations.by_tag("sort").is_none());
}

#[test]
fn test_context_reports_parse_error_per_root() {
    let mut context = ContextModel::new();
    context.set_root_text(RootName::Json, "not json");
    assert!(context.root_error(RootName::Json).is_some());
    assert!(context.root_error(RootName::Node).is_none());

    match context.snapshot() {
        Err(ContextError::InvalidRoot { root, message }) => {
            assert_eq!(root, RootName::Json);
            assert!(!message.is_empty());
        }
        other => panic!("expected an invalid-root error, got {:?}", other),
    }
}

#[test]
fn test_context_blank_root_derives_empty_object() {
    let context = ContextModel::new();
    let snapshot = context.snapshot().unwrap();
    assert_eq!(snapshot.json, val(serde_json::json!({})));
}

#[test]
fn test_context_reparse_recovers() {
    let mut context = ContextModel::new();
    context.set_root_text(RootName::Json, "{broken");
    assert!(context.snapshot().is_err());
    context.set_root_text(RootName::Json, "{\"ok\": 1}");
    assert!(context.snapshot().is_ok());
}

#[test]
fn test_methods_applicable_to_list() {
    let (methods, _) = default_registries();
    let list = val(serde_json::json!([1, 2]));
    let applicable = methods.methods_applicable_to(&list);

    let names: Vec<&str> = applicable.iter().map(|def| def.name.as_str()).collect();
    assert!(names.contains(&"length"));
    assert!(names.contains(&"filter()"));
    // Object-only methods must not leak into list suggestions.
    assert!(!names.contains(&"keys()"));

    // Suggested entries come first, alphabetically within the category.
    let first_other = applicable
        .iter()
        .position(|def| def.category == MethodCategory::Other)
        .unwrap();
    assert!(
        applicable[..first_other]
            .iter()
            .all(|def| def.category == MethodCategory::Suggested)
    );
    assert!(
        applicable[first_other..]
            .iter()
            .all(|def| def.category == MethodCategory::Other)
    );
}

#[test]
fn test_methods_applicable_to_unknown_kind_is_empty() {
    let (methods, _) = default_registries();
    assert!(methods.methods_applicable_to(&Value::Null).is_empty());
    assert!(methods.methods_applicable_to(&Value::Bool(true)).is_empty());
}

#[test]
fn test_method_lookup_tolerates_marker() {
    let (methods, _) = default_registries();
    assert!(methods.by_name("slice").is_some());
    assert!(methods.by_name("slice()").is_some());
    assert!(methods.by_name("length").is_some());
    assert!(methods.by_name("nope()").is_none());

    let slice = methods.by_name("slice()").unwrap();
    assert!(slice.is_invocation());
    assert_eq!(slice.base_name(), "slice");
    assert_eq!(slice.parameters.len(), 2);
    assert!(slice.parameters[1].optional);
}

#[test]
fn test_step_params_targeted_updates() {
    let mut params = StepParams::default();
    assert!(params.set("property", "valor"));
    assert!(params.set("operator", ">"));
    assert!(!params.set("unknown", "x"));
    params.set_arg("start", "1");
    assert_eq!(params.property, "valor");
    assert_eq!(params.arg("start"), Some("1"));
}

#[test]
fn test_error_display() {
    let context_err = ContextError::InvalidRoot {
        root: RootName::Json,
        message: "expected value at line 1".to_string(),
    };
    assert!(context_err.to_string().contains("'json'"));
    assert!(context_err.to_string().contains("expected value"));

    let eval_err = EvalError::TypeMismatch {
        operation: "+".to_string(),
        expected: "Number".to_string(),
        found: Value::Bool(false),
    };
    assert!(eval_err.to_string().contains('+'));
    assert!(eval_err.to_string().contains("Number"));
    assert!(eval_err.to_string().contains("false"));

    let parse_err = ExprParseError::UnexpectedChar { ch: '#', pos: 3 };
    assert!(parse_err.to_string().contains('#'));
}
