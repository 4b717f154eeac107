use super::{Operation, OpKind, StepParams, looks_numeric, quote};
use crate::ast::Value;
use crate::methods::{filter_elements, map_property, reduce_sum};

/// The comparison a filter step's `value` parameter is held against: numeric
/// text compares as a number, everything else as the literal string.
fn coerce_filter_value(raw: &str) -> Value {
    if looks_numeric(raw) {
        Value::Number(raw.trim().parse().unwrap_or(0.0))
    } else {
        Value::String(raw.to_string())
    }
}

fn render_filter_value(raw: &str) -> String {
    if raw.starts_with('$') {
        raw.to_string()
    } else if looks_numeric(raw) {
        raw.trim().to_string()
    } else {
        quote(raw)
    }
}

/// Keeps list elements whose property satisfies a comparison. Non-list
/// inputs evaluate to an empty list.
pub struct FilterOp;

impl Operation for FilterOp {
    fn kind(&self) -> OpKind {
        OpKind::Filter
    }

    fn default_params(&self) -> StepParams {
        StepParams {
            operator: "===".to_string(),
            ..StepParams::default()
        }
    }

    fn evaluate(&self, input: &Value, params: &StepParams) -> Value {
        match input {
            Value::Array(items) => {
                if params.property.is_empty() {
                    return input.clone();
                }
                let against = coerce_filter_value(&params.value);
                Value::Array(filter_elements(
                    items,
                    &params.property,
                    &params.operator,
                    &against,
                ))
            }
            _ => Value::Array(Vec::new()),
        }
    }

    fn emit(&self, preceding: &str, params: &StepParams, _value_hint: Option<&Value>) -> String {
        if params.property.is_empty() {
            return preceding.to_string();
        }
        format!(
            "{}?.filter({}, {}, {})",
            preceding,
            quote(&params.property),
            quote(&params.operator),
            render_filter_value(&params.value),
        )
    }
}

/// Projects every list element to one of its properties. Non-list inputs
/// evaluate to an empty list.
pub struct MapOp;

impl Operation for MapOp {
    fn kind(&self) -> OpKind {
        OpKind::Map
    }

    fn default_params(&self) -> StepParams {
        StepParams::default()
    }

    fn evaluate(&self, input: &Value, params: &StepParams) -> Value {
        match input {
            Value::Array(items) => Value::Array(map_property(items, &params.property)),
            _ => Value::Array(Vec::new()),
        }
    }

    fn emit(&self, preceding: &str, params: &StepParams, _value_hint: Option<&Value>) -> String {
        if params.property.is_empty() {
            return preceding.to_string();
        }
        format!("{}?.map({})", preceding, quote(&params.property))
    }
}

/// Sums the list elements as numbers; non-numeric elements count as zero
/// and non-list inputs evaluate to zero.
pub struct ReduceSumOp;

impl Operation for ReduceSumOp {
    fn kind(&self) -> OpKind {
        OpKind::ReduceSum
    }

    fn default_params(&self) -> StepParams {
        StepParams::default()
    }

    fn evaluate(&self, input: &Value, _params: &StepParams) -> Value {
        match input {
            Value::Array(items) => Value::Number(reduce_sum(items)),
            _ => Value::Number(0.0),
        }
    }

    fn emit(&self, preceding: &str, _params: &StepParams, _value_hint: Option<&Value>) -> String {
        format!("{}?.reduceSum()", preceding)
    }
}
