use super::{Operation, OpKind, StepParams, is_bare_identifier, quote};
use crate::ast::Value;

/// Reads one property off the current value with optional-chaining
/// semantics: a missing property or a non-object input degrades to
/// `Undefined` instead of erroring.
pub struct GetPropertyOp;

impl Operation for GetPropertyOp {
    fn kind(&self) -> OpKind {
        OpKind::GetProperty
    }

    fn default_params(&self) -> StepParams {
        StepParams::default()
    }

    fn evaluate(&self, input: &Value, params: &StepParams) -> Value {
        if params.property.is_empty() {
            return input.clone();
        }
        input
            .get(&params.property)
            .cloned()
            .unwrap_or(Value::Undefined)
    }

    fn emit(&self, preceding: &str, params: &StepParams, _value_hint: Option<&Value>) -> String {
        if params.property.is_empty() {
            return preceding.to_string();
        }
        if is_bare_identifier(&params.property) {
            format!("{}?.{}", preceding, params.property)
        } else {
            format!("{}?.[{}]", preceding, quote(&params.property))
        }
    }
}
