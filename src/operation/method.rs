use super::{Operation, OpKind, StepParams, is_bare_identifier, looks_boolean, looks_numeric, quote};
use crate::ast::Value;
use crate::methods::{MethodRegistry, ParameterSpec, ParameterType};
use itertools::Itertools;
use std::sync::Arc;

/// Invokes an extension method (or reads a bare member such as `.length`) on
/// the current value. Resolution order at evaluation time: the registry's
/// extension implementations first, then the value's own members.
pub struct CallMethodOp {
    methods: Arc<MethodRegistry>,
}

impl CallMethodOp {
    pub fn new(methods: Arc<MethodRegistry>) -> Self {
        Self { methods }
    }

    /// Collects the raw argument texts in declared parameter order. Trailing
    /// omitted optional arguments are dropped; a missing required argument
    /// falls back to its declared default, or to empty text.
    fn ordered_args<'a>(
        specs: &'a [ParameterSpec],
        params: &StepParams,
    ) -> Vec<(&'a ParameterSpec, String)> {
        let mut collected = Vec::with_capacity(specs.len());
        for spec in specs {
            match params.arg(&spec.name) {
                Some(raw) if !raw.is_empty() => collected.push((spec, raw.to_string())),
                _ => match &spec.default_value {
                    Some(default) => collected.push((spec, default.clone())),
                    None if spec.optional => break,
                    None => collected.push((spec, String::new())),
                },
            }
        }
        collected
    }

    /// Raw argument texts when the method is unknown to the registry: the
    /// bag's entries in name order, all treated as `any`.
    fn unknown_args(params: &StepParams) -> Vec<String> {
        params
            .args
            .iter()
            .sorted_by(|a, b| a.0.cmp(b.0))
            .map(|(_, raw)| raw.clone())
            .collect()
    }
}

/// Coerces one raw argument. For `any`-typed parameters the receiver
/// disambiguates numeric-looking text: against string data it stays a
/// string, mirroring how the same argument is rendered by `emit`.
fn coerce_argument(raw: &str, param_type: ParameterType, receiver: &Value) -> Value {
    match param_type {
        ParameterType::Number => Value::Number(raw.trim().parse().unwrap_or(0.0)),
        ParameterType::String => Value::String(raw.to_string()),
        ParameterType::Any => {
            if hint_suggests_string(Some(receiver)) && !looks_boolean(raw) {
                Value::String(raw.to_string())
            } else {
                Value::coerce_literal(raw)
            }
        }
    }
}

/// Whether the preceding live value suggests string data, in which case
/// numeric-looking `any` arguments stay quoted.
fn hint_suggests_string(hint: Option<&Value>) -> bool {
    match hint {
        Some(Value::String(_)) => true,
        Some(Value::Array(items)) => matches!(items.first(), Some(Value::String(_))),
        _ => false,
    }
}

fn render_argument(raw: &str, param_type: ParameterType, hint: Option<&Value>) -> String {
    if raw.starts_with('$') {
        return raw.to_string();
    }
    match param_type {
        ParameterType::Number => Value::Number(raw.trim().parse().unwrap_or(0.0)).to_string(),
        ParameterType::String => quote(raw),
        ParameterType::Any => {
            if looks_boolean(raw) {
                raw.trim().to_string()
            } else if looks_numeric(raw) && !hint_suggests_string(hint) {
                raw.trim().to_string()
            } else {
                quote(raw)
            }
        }
    }
}

impl Operation for CallMethodOp {
    fn kind(&self) -> OpKind {
        OpKind::CallMethod
    }

    fn default_params(&self) -> StepParams {
        StepParams::default()
    }

    fn evaluate(&self, input: &Value, params: &StepParams) -> Value {
        if params.method.is_empty() {
            return input.clone();
        }
        let invocation = params.method.ends_with("()");
        let base = params.method.strip_suffix("()").unwrap_or(&params.method);

        let args: Vec<Value> = match self.methods.by_name(&params.method) {
            Some(def) => Self::ordered_args(&def.parameters, params)
                .into_iter()
                .map(|(spec, raw)| coerce_argument(&raw, spec.param_type, input))
                .collect(),
            None => Self::unknown_args(params)
                .iter()
                .map(|raw| coerce_argument(raw, ParameterType::Any, input))
                .collect(),
        };

        if invocation {
            match self.methods.dispatch(input, base, &args, true) {
                Some(Ok(value)) => value,
                // A failing extension degrades the preview, it never aborts it.
                Some(Err(_)) | None => Value::Undefined,
            }
        } else {
            match self.methods.dispatch(input, base, &[], false) {
                Some(Ok(value)) => value,
                Some(Err(_)) => Value::Undefined,
                None => input.get(base).cloned().unwrap_or(Value::Undefined),
            }
        }
    }

    fn emit(&self, preceding: &str, params: &StepParams, value_hint: Option<&Value>) -> String {
        if params.method.is_empty() {
            return preceding.to_string();
        }
        let invocation = params.method.ends_with("()");
        let base = params.method.strip_suffix("()").unwrap_or(&params.method);

        if !invocation {
            return if is_bare_identifier(base) {
                format!("{}?.{}", preceding, base)
            } else {
                format!("{}?.[{}]", preceding, quote(base))
            };
        }

        let rendered = match self.methods.by_name(&params.method) {
            Some(def) => Self::ordered_args(&def.parameters, params)
                .into_iter()
                .map(|(spec, raw)| render_argument(&raw, spec.param_type, value_hint))
                .join(", "),
            None => Self::unknown_args(params)
                .iter()
                .map(|raw| render_argument(raw, ParameterType::Any, value_hint))
                .join(", "),
        };
        format!("{}?.{}({})", preceding, base, rendered)
    }
}
