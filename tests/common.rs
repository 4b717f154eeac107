//! Common test utilities for building contexts and registries.
use cadeia::prelude::*;

/// Shorthand for building a [`Value`] from a JSON literal.
#[allow(dead_code)]
pub fn val(json: serde_json::Value) -> Value {
    Value::from_json(&json)
}

/// A context whose `json` root holds two orders:
/// one paid (150), one pending (80).
#[allow(dead_code)]
pub fn orders_context() -> ContextModel {
    let mut context = ContextModel::new();
    context.set_root_text(
        RootName::Json,
        r#"{"pedidos": [
            {"valor": 150, "status": "pago"},
            {"valor": 80, "status": "pendente"}
        ]}"#,
    );
    context
}

/// A context whose `json` root holds a nested user record.
#[allow(dead_code)]
pub fn user_context() -> ContextModel {
    let mut context = ContextModel::new();
    context.set_root_text(RootName::Json, r#"{"usuario": {"nome": "Ana"}}"#);
    context
}

/// The default method registry plus an operation registry wired to it.
#[allow(dead_code)]
pub fn default_registries() -> (Arc<MethodRegistry>, Arc<OperationRegistry>) {
    let methods = Arc::new(MethodRegistry::new());
    let operations = Arc::new(OperationRegistry::new(Arc::clone(&methods)));
    (methods, operations)
}

/// A pipeline over the default registries.
#[allow(dead_code)]
pub fn default_pipeline() -> Pipeline {
    let (_, operations) = default_registries();
    Pipeline::new(operations)
}

/// An executor over the default method registry.
#[allow(dead_code)]
pub fn default_executor() -> ExpressionExecutor {
    ExpressionExecutor::new(Arc::new(MethodRegistry::new()))
}
