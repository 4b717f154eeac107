//! Tests for pipeline editing, previews and code generation.
mod common;
use cadeia::prelude::*;
use common::*;

#[test]
fn test_round_trip_nested_property() {
    let context = user_context();
    let mut pipeline = default_pipeline();

    let first = pipeline.add_step(OpKind::GetProperty);
    pipeline.update_step_param(first, "property", "usuario");
    let second = pipeline.add_step(OpKind::GetProperty);
    pipeline.update_step_param(second, "property", "nome");

    assert_eq!(
        pipeline.generated_expression(&context),
        "$json?.usuario?.nome"
    );
    assert_eq!(
        pipeline.generated_template(&context),
        "{{ $json?.usuario?.nome }}"
    );

    let previews = pipeline.step_previews(&context).unwrap();
    assert_eq!(previews.len(), 2);
    assert_eq!(previews[1], Value::String("Ana".to_string()));

    // The generated text evaluates to the same value as the preview.
    let outcome = default_executor().execute(&pipeline.generated_template(&context), &context);
    assert!(!outcome.is_error);
    assert_eq!(outcome.value, previews[1]);
}

#[test]
fn test_filter_scenario() {
    let context = orders_context();
    let mut pipeline = default_pipeline();

    let first = pipeline.add_step(OpKind::GetProperty);
    pipeline.update_step_param(first, "property", "pedidos");
    let second = pipeline.add_step(OpKind::Filter);
    pipeline.update_step_param(second, "property", "status");
    pipeline.update_step_param(second, "value", "pago");

    assert_eq!(
        pipeline.generated_expression(&context),
        "$json?.pedidos?.filter(\"status\", \"===\", \"pago\")"
    );

    let previews = pipeline.step_previews(&context).unwrap();
    assert_eq!(
        previews[1],
        val(serde_json::json!([{"valor": 150, "status": "pago"}]))
    );
}

#[test]
fn test_map_reduce_sum_scenario() {
    let context = orders_context();
    let mut pipeline = default_pipeline();

    let first = pipeline.add_step(OpKind::GetProperty);
    pipeline.update_step_param(first, "property", "pedidos");
    let second = pipeline.add_step(OpKind::Map);
    pipeline.update_step_param(second, "property", "valor");
    pipeline.add_step(OpKind::ReduceSum);

    assert_eq!(
        pipeline.generated_expression(&context),
        "$json?.pedidos?.map(\"valor\")?.reduceSum()"
    );

    let previews = pipeline.step_previews(&context).unwrap();
    assert_eq!(previews[1], val(serde_json::json!([150, 80])));
    assert_eq!(previews[2], Value::Number(230.0));
}

#[test]
fn test_filter_defaults_to_strict_equality() {
    let mut pipeline = default_pipeline();
    let id = pipeline.add_step(OpKind::Filter);
    assert_eq!(pipeline.step(id).unwrap().params.operator, "===");
}

#[test]
fn test_numeric_filter_value_emits_bare() {
    let context = orders_context();
    let mut pipeline = default_pipeline();

    let first = pipeline.add_step(OpKind::GetProperty);
    pipeline.update_step_param(first, "property", "pedidos");
    let second = pipeline.add_step(OpKind::Filter);
    pipeline.update_step_param(second, "property", "valor");
    pipeline.update_step_param(second, "operator", ">");
    pipeline.update_step_param(second, "value", "100");

    assert_eq!(
        pipeline.generated_expression(&context),
        "$json?.pedidos?.filter(\"valor\", \">\", 100)"
    );
    let previews = pipeline.step_previews(&context).unwrap();
    assert_eq!(
        previews[1],
        val(serde_json::json!([{"valor": 150, "status": "pago"}]))
    );
}

#[test]
fn test_set_root_clears_steps() {
    let mut pipeline = default_pipeline();
    pipeline.add_step(OpKind::GetProperty);
    pipeline.add_step(OpKind::ReduceSum);
    assert_eq!(pipeline.steps().len(), 2);

    pipeline.set_root(RootName::Env);
    assert_eq!(pipeline.root(), RootName::Env);
    assert!(pipeline.steps().is_empty());
    assert_eq!(
        pipeline.generated_expression(&ContextModel::new()),
        "$env"
    );
}

#[test]
fn test_remove_step_preserves_others() {
    let mut pipeline = default_pipeline();
    let a = pipeline.add_step(OpKind::GetProperty);
    let b = pipeline.add_step(OpKind::Map);
    let c = pipeline.add_step(OpKind::ReduceSum);

    assert!(pipeline.remove_step(b));
    assert!(!pipeline.remove_step(b));

    let ids: Vec<StepId> = pipeline.steps().iter().map(|step| step.id).collect();
    assert_eq!(ids, vec![a, c]);
}

#[test]
fn test_update_step_param_unknown_key_or_id() {
    let mut pipeline = default_pipeline();
    let id = pipeline.add_step(OpKind::GetProperty);
    assert!(pipeline.update_step_param(id, "property", "x"));
    assert!(!pipeline.update_step_param(id, "bogus", "x"));
    assert!(!pipeline.update_step_param(9999, "property", "x"));
}

#[test]
fn test_preview_short_circuits_after_failed_step() {
    let context = orders_context();
    let mut pipeline = default_pipeline();

    let first = pipeline.add_step(OpKind::GetProperty);
    pipeline.update_step_param(first, "property", "inexistente");
    pipeline.add_step(OpKind::Filter);
    pipeline.add_step(OpKind::ReduceSum);

    let previews = pipeline.step_previews(&context).unwrap();
    // Later steps are not evaluated once a step degraded to undefined;
    // otherwise reduceSum would report 0 here.
    assert_eq!(previews, vec![Value::Undefined; 3]);
}

#[test]
fn test_codegen_survives_invalid_context() {
    let mut context = ContextModel::new();
    context.set_root_text(RootName::Json, "not json");

    let mut pipeline = default_pipeline();
    let id = pipeline.add_step(OpKind::GetProperty);
    pipeline.update_step_param(id, "property", "usuario");

    assert!(pipeline.step_previews(&context).is_err());
    assert_eq!(pipeline.generated_expression(&context), "$json?.usuario");
}

#[test]
fn test_emit_is_total_with_empty_params() {
    let context = ContextModel::new();
    let mut pipeline = default_pipeline();
    pipeline.add_step(OpKind::GetProperty);
    pipeline.add_step(OpKind::Filter);
    pipeline.add_step(OpKind::Map);
    pipeline.add_step(OpKind::CallMethod);

    // Steps with missing property/method names leave the code unchanged.
    assert_eq!(pipeline.generated_expression(&context), "$json");
}

#[test]
fn test_quoted_access_for_non_identifier_property() {
    let mut context = ContextModel::new();
    context.set_root_text(RootName::Json, r#"{"nome completo": "Ana Lima"}"#);

    let mut pipeline = default_pipeline();
    let id = pipeline.add_step(OpKind::GetProperty);
    pipeline.update_step_param(id, "property", "nome completo");

    assert_eq!(
        pipeline.generated_expression(&context),
        "$json?.[\"nome completo\"]"
    );
    let previews = pipeline.step_previews(&context).unwrap();
    assert_eq!(previews[0], Value::String("Ana Lima".to_string()));

    // Bracket access round-trips through the executor too.
    let outcome = default_executor().execute(&pipeline.generated_template(&context), &context);
    assert_eq!(outcome.value, previews[0]);
}

#[test]
fn test_call_method_step_bare_member() {
    let context = orders_context();
    let mut pipeline = default_pipeline();

    let first = pipeline.add_step(OpKind::GetProperty);
    pipeline.update_step_param(first, "property", "pedidos");
    let second = pipeline.add_step(OpKind::CallMethod);
    pipeline.update_step_param(second, "method", "length");

    assert_eq!(
        pipeline.generated_expression(&context),
        "$json?.pedidos?.length"
    );
    let previews = pipeline.step_previews(&context).unwrap();
    assert_eq!(previews[1], Value::Number(2.0));
}

#[test]
fn test_call_method_step_drops_trailing_optional_args() {
    let context = orders_context();
    let mut pipeline = default_pipeline();

    let first = pipeline.add_step(OpKind::GetProperty);
    pipeline.update_step_param(first, "property", "pedidos");
    let second = pipeline.add_step(OpKind::CallMethod);
    pipeline.update_step_param(second, "method", "slice()");
    pipeline.update_step_arg(second, "start", "1");

    assert_eq!(
        pipeline.generated_expression(&context),
        "$json?.pedidos?.slice(1)"
    );
    let previews = pipeline.step_previews(&context).unwrap();
    assert_eq!(
        previews[1],
        val(serde_json::json!([{"valor": 80, "status": "pendente"}]))
    );
}

#[test]
fn test_call_method_argument_rendering_follows_value_hint() {
    let mut context = ContextModel::new();
    context.set_root_text(RootName::Json, r#"{"codigos": ["007", "abc"]}"#);

    let mut pipeline = default_pipeline();
    let first = pipeline.add_step(OpKind::GetProperty);
    pipeline.update_step_param(first, "property", "codigos");
    let second = pipeline.add_step(OpKind::CallMethod);
    pipeline.update_step_param(second, "method", "includes()");
    pipeline.update_step_arg(second, "search", "007");

    // Against string data a numeric-looking argument stays quoted.
    assert_eq!(
        pipeline.generated_expression(&context),
        "$json?.codigos?.includes(\"007\")"
    );
    let previews = pipeline.step_previews(&context).unwrap();
    assert_eq!(previews[1], Value::Bool(true));

    // Against numeric data the same argument is emitted bare.
    context.set_root_text(RootName::Json, r#"{"codigos": [7, 8]}"#);
    pipeline.update_step_arg(second, "search", "7");
    assert_eq!(
        pipeline.generated_expression(&context),
        "$json?.codigos?.includes(7)"
    );
}

#[test]
fn test_live_reference_argument_stays_unquoted() {
    let mut context = ContextModel::new();
    context.set_root_text(RootName::Json, r#"{"tags": ["a"], "alvo": "a"}"#);

    let mut pipeline = default_pipeline();
    let first = pipeline.add_step(OpKind::GetProperty);
    pipeline.update_step_param(first, "property", "tags");
    let second = pipeline.add_step(OpKind::CallMethod);
    pipeline.update_step_param(second, "method", "includes()");
    pipeline.update_step_arg(second, "search", "$json?.alvo");

    let generated = pipeline.generated_expression(&context);
    assert_eq!(generated, "$json?.tags?.includes($json?.alvo)");

    let outcome = default_executor().execute(&generated, &context);
    assert_eq!(outcome.value, Value::Bool(true));
}
